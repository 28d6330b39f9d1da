//! Shared test fixtures for integration tests.

use bess_apm_sim::model::{
    ApmPlatformSpec, BessAsset, Chemistry, MarketConditions, SimulationParameters,
};

/// Default asset: the documented 100 MWh / 50 MW LFP site at $80M capital.
pub fn default_asset() -> BessAsset {
    BessAsset::new(100.0, 50.0, Chemistry::Lfp, 0.85, 80_000_000.0, 6000)
        .expect("default asset is valid")
}

/// Default market: $85/MWh spot, 0.3 volatility, $12 FCAS, 0.35 capacity factor.
pub fn default_market() -> MarketConditions {
    MarketConditions::new(85.0, 0.3, 12.0, 0.35).expect("default market is valid")
}

/// The advanced APM tier ($500k/yr, $1.2M implementation, 15/12/8/20% benefits).
pub fn advanced_apm() -> ApmPlatformSpec {
    ApmPlatformSpec::new(500_000.0, 1_200_000.0, 0.15, 0.12, 0.08, 0.20)
        .expect("advanced spec is valid")
}

/// Run parameters with the given iteration count, horizon, and seed.
pub fn params(iterations: usize, horizon_years: usize, seed: u64) -> SimulationParameters {
    SimulationParameters::new(iterations, horizon_years, 0.08, Some(seed))
        .expect("params are valid")
}
