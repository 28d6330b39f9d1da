use super::ValidationError;

/// Default random seed used when a scenario does not supply one.
pub const DEFAULT_SEED: u64 = 42;

/// Monte Carlo run parameters.
///
/// Fixed for the lifetime of one run; echoed into the results for
/// provenance.
#[derive(Debug, Clone)]
pub struct SimulationParameters {
    /// Number of Monte Carlo iterations (> 0, typically 1000 to 10000).
    pub iterations: usize,
    /// Analysis horizon in years (> 0).
    pub horizon_years: usize,
    /// Annual discount rate for NPV as a fraction (>= 0).
    pub discount_rate: f64,
    /// Master random seed.
    pub seed: u64,
}

impl SimulationParameters {
    /// Creates validated run parameters; `seed` defaults to
    /// [`DEFAULT_SEED`] when `None`.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when the iteration count or horizon is
    /// zero, or the discount rate is negative.
    pub fn new(
        iterations: usize,
        horizon_years: usize,
        discount_rate: f64,
        seed: Option<u64>,
    ) -> Result<Self, ValidationError> {
        let params = Self {
            iterations,
            horizon_years,
            discount_rate,
            seed: seed.unwrap_or(DEFAULT_SEED),
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks all field invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a `ValidationError`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.iterations == 0 {
            return Err(ValidationError::new("simulation.iterations", "must be > 0"));
        }
        if self.horizon_years == 0 {
            return Err(ValidationError::new(
                "simulation.horizon_years",
                "must be > 0",
            ));
        }
        if !self.discount_rate.is_finite() || self.discount_rate < 0.0 {
            return Err(ValidationError::new(
                "simulation.discount_rate",
                "must be >= 0",
            ));
        }
        Ok(())
    }
}
