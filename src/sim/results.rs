//! Post-hoc statistical aggregation of a complete Monte Carlo run.

use std::fmt;

use crate::model::{ApmPlatformSpec, BessAsset, MarketConditions, SimulationParameters};

use super::monte_carlo::TrialOutcome;

/// Percentile (0 to 100) used for the Value-at-Risk figure.
const VAR_PERCENTILE: f64 = 5.0;

/// Summary statistics of one empirical distribution.
#[derive(Debug, Clone, Copy)]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub p5: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
}

impl SummaryStats {
    /// Computes statistics from an unordered sample set.
    ///
    /// Returns all-zero stats for an empty sample (the orchestrator never
    /// produces one, but the guard keeps this total).
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self {
                mean: 0.0,
                median: 0.0,
                std_dev: 0.0,
                p5: 0.0,
                p25: 0.0,
                p75: 0.0,
                p95: 0.0,
            };
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            mean,
            median: percentile(&sorted, 50.0),
            std_dev: variance.sqrt(),
            p5: percentile(&sorted, 5.0),
            p25: percentile(&sorted, 25.0),
            p75: percentile(&sorted, 75.0),
            p95: percentile(&sorted, 95.0),
        }
    }
}

/// Linear-interpolated percentile of an ascending-sorted sample set.
///
/// `p` is in [0, 100]. Ranks between sample points interpolate linearly;
/// out-of-range `p` clamps to the extremes.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * weight
}

/// Read-only comparative summary of a full simulation run, handed to the
/// presentation layer. Echoes the inputs for provenance.
#[derive(Debug, Clone)]
pub struct ComparativeResults {
    /// Per-iteration NPV improvement, in iteration order (for plotting).
    pub npv_improvements: Vec<f64>,
    /// Full per-trial outcomes, in iteration order.
    pub trials: Vec<TrialOutcome>,
    /// Summary statistics of the NPV-improvement distribution.
    pub improvement: SummaryStats,
    /// Empirical probability that the improvement is strictly positive.
    pub prob_positive_roi: f64,
    /// Value at Risk: the 5th percentile of the improvement distribution.
    pub value_at_risk: f64,
    /// Mean IRR of the APM scenario over trials where it is defined.
    pub mean_irr_apm: Option<f64>,
    /// Number of trials with an undefined APM-scenario IRR.
    pub undefined_irr_count: usize,
    /// Mean payback year of the APM scenario over trials where it is finite.
    pub mean_payback_year: Option<f64>,
    /// Number of trials whose APM payback lies beyond the horizon.
    pub beyond_horizon_count: usize,
    /// Mean final capacity fraction, baseline scenario.
    pub mean_final_capacity_base: f64,
    /// Mean final capacity fraction, APM scenario.
    pub mean_final_capacity_apm: f64,
    /// Mean availability, baseline scenario.
    pub mean_availability_base: f64,
    /// Mean availability, APM scenario.
    pub mean_availability_apm: f64,
    /// Mean total revenue over the horizon, baseline scenario.
    pub mean_total_revenue_base: f64,
    /// Mean total revenue over the horizon, APM scenario.
    pub mean_total_revenue_apm: f64,
    /// Mean total operating cost over the horizon, baseline scenario.
    pub mean_total_opex_base: f64,
    /// Mean total operating cost over the horizon, APM scenario.
    pub mean_total_opex_apm: f64,
    /// Echoed asset description.
    pub asset: BessAsset,
    /// Echoed market conditions.
    pub market: MarketConditions,
    /// Echoed APM platform specification.
    pub apm_spec: ApmPlatformSpec,
    /// Echoed run parameters (including the seed actually used).
    pub params: SimulationParameters,
}

impl ComparativeResults {
    /// Builds the aggregate from completed trials.
    ///
    /// Undefined IRRs and beyond-horizon paybacks are counted and skipped,
    /// never coerced to zero. All reductions are commutative, so the
    /// result does not depend on trial execution order.
    pub fn from_trials(
        trials: Vec<TrialOutcome>,
        asset: BessAsset,
        market: MarketConditions,
        apm_spec: ApmPlatformSpec,
        params: SimulationParameters,
    ) -> Self {
        let n = trials.len() as f64;
        let npv_improvements: Vec<f64> = trials.iter().map(|t| t.npv_improvement).collect();
        let improvement = SummaryStats::from_samples(&npv_improvements);

        let positive = trials.iter().filter(|t| t.positive_roi).count();

        let defined_irrs: Vec<f64> = trials.iter().filter_map(|t| t.apm.irr).collect();
        let mean_irr_apm = if defined_irrs.is_empty() {
            None
        } else {
            Some(defined_irrs.iter().sum::<f64>() / defined_irrs.len() as f64)
        };

        let finite_paybacks: Vec<usize> =
            trials.iter().filter_map(|t| t.apm.payback_year).collect();
        let mean_payback_year = if finite_paybacks.is_empty() {
            None
        } else {
            Some(finite_paybacks.iter().sum::<usize>() as f64 / finite_paybacks.len() as f64)
        };

        let mut sorted_improvements = npv_improvements.clone();
        sorted_improvements.sort_by(f64::total_cmp);
        let value_at_risk = percentile(&sorted_improvements, VAR_PERCENTILE);

        let mean_over = |f: fn(&TrialOutcome) -> f64| -> f64 {
            if trials.is_empty() {
                0.0
            } else {
                trials.iter().map(f).sum::<f64>() / n
            }
        };
        let prob_positive_roi = if trials.is_empty() {
            0.0
        } else {
            positive as f64 / n
        };
        let mean_final_capacity_base = mean_over(|t| t.base_summary.final_capacity_frac);
        let mean_final_capacity_apm = mean_over(|t| t.apm_summary.final_capacity_frac);
        let mean_availability_base = mean_over(|t| t.base_summary.mean_availability);
        let mean_availability_apm = mean_over(|t| t.apm_summary.mean_availability);
        let mean_total_revenue_base = mean_over(|t| t.base_summary.total_revenue);
        let mean_total_revenue_apm = mean_over(|t| t.apm_summary.total_revenue);
        let mean_total_opex_base = mean_over(|t| t.base_summary.total_opex);
        let mean_total_opex_apm = mean_over(|t| t.apm_summary.total_opex);

        Self {
            improvement,
            prob_positive_roi,
            value_at_risk,
            undefined_irr_count: trials.len() - defined_irrs.len(),
            mean_irr_apm,
            beyond_horizon_count: trials.len() - finite_paybacks.len(),
            mean_payback_year,
            mean_final_capacity_base,
            mean_final_capacity_apm,
            mean_availability_base,
            mean_availability_apm,
            mean_total_revenue_base,
            mean_total_revenue_apm,
            mean_total_opex_base,
            mean_total_opex_apm,
            npv_improvements,
            trials,
            asset,
            market,
            apm_spec,
            params,
        }
    }
}

/// Formats a currency amount in millions with two decimals.
fn millions(value: f64) -> String {
    format!("${:.2}M", value / 1_000_000.0)
}

impl fmt::Display for ComparativeResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- APM Investment Analysis ---")?;
        writeln!(
            f,
            "Asset:                  {:.0} MWh / {:.0} MW {} (capital {})",
            self.asset.capacity_mwh,
            self.asset.power_mw,
            self.asset.chemistry,
            millions(self.asset.capital_cost)
        )?;
        writeln!(
            f,
            "Run:                    {} iterations x {} years, seed {}",
            self.params.iterations, self.params.horizon_years, self.params.seed
        )?;
        writeln!(
            f,
            "Mean NPV improvement:   {}",
            millions(self.improvement.mean)
        )?;
        writeln!(
            f,
            "Median NPV improvement: {}",
            millions(self.improvement.median)
        )?;
        writeln!(
            f,
            "Std deviation:          {}",
            millions(self.improvement.std_dev)
        )?;
        writeln!(
            f,
            "P(positive ROI):        {:.1}%",
            self.prob_positive_roi * 100.0
        )?;
        writeln!(
            f,
            "VaR (5th percentile):   {}",
            millions(self.value_at_risk)
        )?;
        match self.mean_irr_apm {
            Some(irr) => writeln!(
                f,
                "Mean IRR (APM):         {:.1}% ({} undefined)",
                irr * 100.0,
                self.undefined_irr_count
            )?,
            None => writeln!(f, "Mean IRR (APM):         undefined in all trials")?,
        }
        match self.mean_payback_year {
            Some(payback) => writeln!(
                f,
                "Mean payback:           {:.1} years ({} beyond horizon)",
                payback, self.beyond_horizon_count
            )?,
            None => writeln!(f, "Mean payback:           beyond horizon in all trials")?,
        }
        writeln!(
            f,
            "Total revenue:          {} base / {} APM",
            millions(self.mean_total_revenue_base),
            millions(self.mean_total_revenue_apm)
        )?;
        writeln!(
            f,
            "Total opex:             {} base / {} APM",
            millions(self.mean_total_opex_base),
            millions(self.mean_total_opex_apm)
        )?;
        writeln!(
            f,
            "Final capacity:         {:.1}% base / {:.1}% APM",
            self.mean_final_capacity_base * 100.0,
            self.mean_final_capacity_apm * 100.0
        )?;
        write!(
            f,
            "Mean availability:      {:.1}% base / {:.1}% APM",
            self.mean_availability_base * 100.0,
            self.mean_availability_apm * 100.0
        )
    }
}
