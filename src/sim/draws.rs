//! Per-iteration, per-year stochastic draws.
//!
//! Every draw is derived from a dedicated RNG seeded by
//! (master seed, iteration index, year index), so a given trial is
//! reproducible no matter which worker executes it or in which order.
//! Baseline and APM scenarios of the same iteration consume the same
//! draw path (paired-path variance reduction); the failure event is
//! therefore emitted as the uniform behind the Bernoulli, and each
//! scenario compares it to its own adjusted probability.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Standard deviation of the additive degradation noise.
const DEGRADATION_NOISE_STD: f64 = 0.005;

/// Stochastic variates for one simulated year.
#[derive(Debug, Clone, Copy)]
pub struct YearDraws {
    /// Multiplier applied to the average spot price (lognormal, mean 1.0).
    pub price_multiplier: f64,
    /// Additive noise on the deterministic annual fade rate.
    pub degradation_noise: f64,
    /// Uniform draw in [0, 1) deciding the failure event; a scenario
    /// fails when this is below its adjusted failure probability.
    pub failure_u: f64,
}

/// The full draw sequence for one iteration.
#[derive(Debug, Clone)]
pub struct DrawPath {
    pub years: Vec<YearDraws>,
}

/// Deterministic generator of per-(iteration, year) draw streams.
#[derive(Debug, Clone)]
pub struct DrawGenerator {
    seed: u64,
    price_volatility: f64,
}

impl DrawGenerator {
    /// Creates a generator for the given master seed and lognormal price
    /// volatility (sigma, >= 0).
    pub fn new(seed: u64, price_volatility: f64) -> Self {
        Self {
            seed,
            price_volatility,
        }
    }

    /// Draws the variates for one (iteration, year) cell.
    ///
    /// The price multiplier is lognormal with `mu = -sigma^2 / 2`, which
    /// puts its mean at exactly 1.0 so noisy prices revert to the
    /// configured average. Zero volatility collapses it to 1.0.
    pub fn year_draws(&self, iteration: u64, year: u64) -> YearDraws {
        let mut rng = StdRng::seed_from_u64(stream_seed(self.seed, iteration, year));

        let sigma = self.price_volatility;
        let price_multiplier = if sigma > 0.0 {
            (gaussian(&mut rng, sigma) - 0.5 * sigma * sigma).exp()
        } else {
            1.0
        };
        let degradation_noise = gaussian(&mut rng, DEGRADATION_NOISE_STD);
        let failure_u = rng.random::<f64>();

        YearDraws {
            price_multiplier,
            degradation_noise,
            failure_u,
        }
    }

    /// Builds the complete draw path for one iteration.
    pub fn path(&self, iteration: u64, horizon_years: usize) -> DrawPath {
        let years = (0..horizon_years)
            .map(|year| self.year_draws(iteration, year as u64))
            .collect();
        DrawPath { years }
    }
}

/// Mixes (seed, iteration, year) into one stream seed.
///
/// Splitmix-style finalization so that neighboring iteration and year
/// indices land on unrelated streams.
fn stream_seed(seed: u64, iteration: u64, year: u64) -> u64 {
    let mut h = seed ^ 0x9E37_79B9_7F4A_7C15;
    h = h.wrapping_add(iteration).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h ^= h >> 31;
    h = h.wrapping_add(year).wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^= h >> 29;
    h
}

/// Gaussian variate with mean 0 via the Box-Muller transform.
fn gaussian(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
