//! Monte Carlo orchestration: paired baseline/APM trials over a shared
//! draw path, fanned out across a worker pool.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::finance::FinancialResult;
use crate::model::{
    ApmPlatformSpec, BessAsset, MarketConditions, SimulationParameters, ValidationError,
};

use super::draws::DrawGenerator;
use super::engine::{ScenarioEngine, ScenarioPath};
use super::results::ComparativeResults;

/// Horizon-level summary of one scenario within one trial.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioSummary {
    /// Remaining capacity fraction at the end of the horizon.
    pub final_capacity_frac: f64,
    /// Mean availability over the horizon.
    pub mean_availability: f64,
    /// Total undiscounted revenue over the horizon.
    pub total_revenue: f64,
    /// Total undiscounted operating cost over the horizon.
    pub total_opex: f64,
}

impl ScenarioSummary {
    fn from_path(path: &ScenarioPath) -> Self {
        Self {
            final_capacity_frac: path.final_capacity_frac(),
            mean_availability: path.mean_availability(),
            total_revenue: path.total_revenue(),
            total_opex: path.total_opex(),
        }
    }
}

/// Outcome of one Monte Carlo iteration: both scenarios evaluated on the
/// same draw path. Immutable once produced.
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    /// Iteration index this trial was seeded with.
    pub iteration: usize,
    /// Financial result of the baseline (no APM) scenario.
    pub base: FinancialResult,
    /// Financial result of the APM scenario.
    pub apm: FinancialResult,
    /// NPV(APM) minus NPV(baseline).
    pub npv_improvement: f64,
    /// Whether the improvement is strictly positive.
    pub positive_roi: bool,
    /// Performance summary of the baseline scenario.
    pub base_summary: ScenarioSummary,
    /// Performance summary of the APM scenario.
    pub apm_summary: ScenarioSummary,
}

/// Runs the full paired Monte Carlo analysis. The single entry point of
/// the simulation core.
///
/// All inputs are validated before any iteration runs; invalid input
/// never produces partial results. Trials are independent pure functions
/// of (inputs, seed, iteration index) and execute on rayon's worker
/// pool; results are collected in iteration order, so the aggregate is
/// identical no matter how trials were scheduled.
///
/// # Errors
///
/// Returns a `ValidationError` when any input violates its invariants.
pub fn run_simulation(
    asset: &BessAsset,
    market: &MarketConditions,
    apm_spec: &ApmPlatformSpec,
    params: &SimulationParameters,
) -> Result<ComparativeResults, ValidationError> {
    asset.validate()?;
    market.validate()?;
    apm_spec.validate()?;
    params.validate()?;

    let generator = DrawGenerator::new(params.seed, market.price_volatility);
    let baseline_spec = ApmPlatformSpec::none();

    let trials: Vec<TrialOutcome> = (0..params.iterations)
        .into_par_iter()
        .map(|iteration| {
            run_trial(
                iteration,
                asset,
                market,
                apm_spec,
                &baseline_spec,
                &generator,
                params,
            )
        })
        .collect();

    Ok(ComparativeResults::from_trials(
        trials,
        asset.clone(),
        market.clone(),
        apm_spec.clone(),
        params.clone(),
    ))
}

/// Evaluates both scenarios of one iteration on the same draw path.
fn run_trial(
    iteration: usize,
    asset: &BessAsset,
    market: &MarketConditions,
    apm_spec: &ApmPlatformSpec,
    baseline_spec: &ApmPlatformSpec,
    generator: &DrawGenerator,
    params: &SimulationParameters,
) -> TrialOutcome {
    let path = generator.path(iteration as u64, params.horizon_years);

    let base_path = ScenarioEngine::new(asset, market, baseline_spec).run(&path);
    let apm_path = ScenarioEngine::new(asset, market, apm_spec).run(&path);

    let base = FinancialResult::from_cash_flows(&base_path.cash_flows, params.discount_rate);
    let apm = FinancialResult::from_cash_flows(&apm_path.cash_flows, params.discount_rate);
    let npv_improvement = apm.npv - base.npv;

    TrialOutcome {
        iteration,
        npv_improvement,
        positive_roi: npv_improvement > 0.0,
        base_summary: ScenarioSummary::from_path(&base_path),
        apm_summary: ScenarioSummary::from_path(&apm_path),
        base,
        apm,
    }
}
