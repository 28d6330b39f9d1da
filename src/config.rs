//! TOML-based scenario configuration and the APM platform preset catalog.
//!
//! The simulation core only ever consumes validated model values; this
//! module is the outer layer that parses files and named presets into
//! them. All fields default to the reference site (100 MWh / 50 MW LFP
//! asset under the documented market assumptions).

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::model::{
    ApmPlatformSpec, BessAsset, MarketConditions, SimulationParameters, ValidationError,
};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults. Load from TOML with
/// [`ScenarioConfig::from_toml_file`], pick a named platform tier with
/// [`ScenarioConfig::from_preset`], or use [`ScenarioConfig::baseline`]
/// for the built-in default (the `advanced` tier).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// BESS asset parameters.
    pub asset: AssetConfig,
    /// Market conditions.
    pub market: MarketConfig,
    /// APM platform costs and benefit factors.
    pub apm: ApmConfig,
    /// Monte Carlo run parameters.
    pub simulation: SimulationConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            asset: AssetConfig::default(),
            market: MarketConfig::default(),
            apm: ApmConfig::advanced(),
            simulation: SimulationConfig::default(),
        }
    }
}

/// BESS asset parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetConfig {
    /// Energy capacity (MWh).
    pub capacity_mwh: f64,
    /// Power rating (MW).
    pub power_mw: f64,
    /// Cell chemistry: `"LFP"`, `"NMC"`, or `"LTO"`.
    pub chemistry: String,
    /// Round-trip efficiency (0-1].
    pub round_trip_efficiency: f64,
    /// Initial capital cost.
    pub capital_cost: f64,
    /// Design cycle life.
    pub cycle_life: u32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            capacity_mwh: 100.0,
            power_mw: 50.0,
            chemistry: "LFP".to_string(),
            round_trip_efficiency: 0.85,
            capital_cost: 80_000_000.0,
            cycle_life: 6000,
        }
    }
}

/// Market conditions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketConfig {
    /// Average spot price (currency/MWh).
    pub spot_price: f64,
    /// Lognormal sigma of the annual price multiplier.
    pub price_volatility: f64,
    /// Average FCAS price (currency/MW/h).
    pub fcas_price: f64,
    /// Dispatch capacity factor (0-1).
    pub capacity_factor: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            spot_price: 85.0,
            price_volatility: 0.3,
            fcas_price: 12.0,
            capacity_factor: 0.35,
        }
    }
}

/// APM platform costs and benefit factors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApmConfig {
    /// Annual subscription fee.
    pub annual_fee: f64,
    /// One-time implementation cost.
    pub implementation_cost: f64,
    /// Unplanned-downtime reduction fraction.
    pub downtime_reduction: f64,
    /// Dispatch revenue uplift fraction.
    pub dispatch_uplift: f64,
    /// Degradation-rate reduction fraction.
    pub degradation_reduction: f64,
    /// Maintenance-cost reduction fraction.
    pub maintenance_reduction: f64,
}

impl Default for ApmConfig {
    fn default() -> Self {
        Self::advanced()
    }
}

impl ApmConfig {
    /// Entry-level tier: $200k/yr, $500k implementation, 10/8/5/15% benefits.
    pub fn basic() -> Self {
        Self {
            annual_fee: 200_000.0,
            implementation_cost: 500_000.0,
            downtime_reduction: 0.10,
            dispatch_uplift: 0.08,
            degradation_reduction: 0.05,
            maintenance_reduction: 0.15,
        }
    }

    /// Mid tier: $500k/yr, $1.2M implementation, 15/12/8/20% benefits.
    pub fn advanced() -> Self {
        Self {
            annual_fee: 500_000.0,
            implementation_cost: 1_200_000.0,
            downtime_reduction: 0.15,
            dispatch_uplift: 0.12,
            degradation_reduction: 0.08,
            maintenance_reduction: 0.20,
        }
    }

    /// Top tier: $800k/yr, $2M implementation, 25/18/12/30% benefits.
    pub fn enterprise() -> Self {
        Self {
            annual_fee: 800_000.0,
            implementation_cost: 2_000_000.0,
            downtime_reduction: 0.25,
            dispatch_uplift: 0.18,
            degradation_reduction: 0.12,
            maintenance_reduction: 0.30,
        }
    }

    /// Zero-cost, zero-benefit tier; makes the APM scenario collapse onto
    /// the baseline.
    pub fn no_apm() -> Self {
        Self {
            annual_fee: 0.0,
            implementation_cost: 0.0,
            downtime_reduction: 0.0,
            dispatch_uplift: 0.0,
            degradation_reduction: 0.0,
            maintenance_reduction: 0.0,
        }
    }
}

/// Monte Carlo run parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of iterations.
    pub iterations: usize,
    /// Analysis horizon in years.
    pub horizon_years: usize,
    /// Annual discount rate (fraction).
    pub discount_rate: f64,
    /// Master random seed.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            horizon_years: 15,
            discount_rate: 0.08,
            seed: 42,
        }
    }
}

impl ScenarioConfig {
    /// Returns the default scenario (reference asset, `advanced` tier).
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Available preset names (APM platform tiers).
    pub const PRESETS: &[&str] = &["basic", "advanced", "enterprise", "no_apm"];

    /// Loads the default scenario with a named APM platform tier.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ValidationError> {
        let apm = match name {
            "basic" => ApmConfig::basic(),
            "advanced" => ApmConfig::advanced(),
            "enterprise" => ApmConfig::enterprise(),
            "no_apm" => ApmConfig::no_apm(),
            _ => {
                return Err(ValidationError::new(
                    "preset",
                    format!(
                        "unknown preset \"{name}\", available: {}",
                        Self::PRESETS.join(", ")
                    ),
                ));
            }
        };
        Ok(Self {
            apm,
            ..Self::default()
        })
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the file cannot be read or the TOML
    /// is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ValidationError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ValidationError::new(
                "scenario",
                format!("cannot read \"{}\": {e}", path.display()),
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the TOML is invalid or contains
    /// unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ValidationError> {
        toml::from_str(s).map_err(|e| ValidationError::new("toml", e.to_string()))
    }

    /// Converts the raw configuration into validated core inputs.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found, with its dotted field
    /// path, before any simulation work happens.
    #[expect(clippy::type_complexity)]
    pub fn build(
        &self,
    ) -> Result<
        (
            BessAsset,
            MarketConditions,
            ApmPlatformSpec,
            SimulationParameters,
        ),
        ValidationError,
    > {
        let chemistry = self.asset.chemistry.parse().map_err(|e: ValidationError| {
            ValidationError::new("asset.chemistry", e.message)
        })?;
        let asset = BessAsset::new(
            self.asset.capacity_mwh,
            self.asset.power_mw,
            chemistry,
            self.asset.round_trip_efficiency,
            self.asset.capital_cost,
            self.asset.cycle_life,
        )?;
        let market = MarketConditions::new(
            self.market.spot_price,
            self.market.price_volatility,
            self.market.fcas_price,
            self.market.capacity_factor,
        )?;
        let apm_spec = ApmPlatformSpec::new(
            self.apm.annual_fee,
            self.apm.implementation_cost,
            self.apm.downtime_reduction,
            self.apm.dispatch_uplift,
            self.apm.degradation_reduction,
            self.apm.maintenance_reduction,
        )?;
        let params = SimulationParameters::new(
            self.simulation.iterations,
            self.simulation.horizon_years,
            self.simulation.discount_rate,
            Some(self.simulation.seed),
        )?;
        Ok((asset, market, apm_spec, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_builds_valid_inputs() {
        let cfg = ScenarioConfig::baseline();
        assert!(cfg.build().is_ok(), "baseline config should validate");
    }

    #[test]
    fn all_presets_build() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            assert!(
                cfg.expect("preset loads").build().is_ok(),
                "preset \"{name}\" should validate"
            );
        }
    }

    #[test]
    fn from_preset_unknown_name() {
        let err = ScenarioConfig::from_preset("deluxe").unwrap_err();
        assert!(err.message.contains("unknown preset"));
    }

    #[test]
    fn preset_tiers_scale_together() {
        let basic = ApmConfig::basic();
        let advanced = ApmConfig::advanced();
        let enterprise = ApmConfig::enterprise();
        assert!(basic.annual_fee < advanced.annual_fee);
        assert!(advanced.annual_fee < enterprise.annual_fee);
        assert!(basic.dispatch_uplift < advanced.dispatch_uplift);
        assert!(advanced.dispatch_uplift < enterprise.dispatch_uplift);
    }

    #[test]
    fn no_apm_preset_is_all_zero() {
        let cfg = ScenarioConfig::from_preset("no_apm").expect("preset loads");
        let (_, _, spec, _) = cfg.build().expect("builds");
        assert_eq!(spec.annual_fee, 0.0);
        assert_eq!(spec.implementation_cost, 0.0);
        assert_eq!(spec.dispatch_uplift, 0.0);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[asset]
capacity_mwh = 200.0
power_mw = 100.0
chemistry = "NMC"
round_trip_efficiency = 0.90
capital_cost = 150000000.0
cycle_life = 5000

[market]
spot_price = 95.0
price_volatility = 0.4
fcas_price = 15.0
capacity_factor = 0.45

[apm]
annual_fee = 300000.0
implementation_cost = 900000.0
downtime_reduction = 0.12
dispatch_uplift = 0.10
degradation_reduction = 0.06
maintenance_reduction = 0.18

[simulation]
iterations = 2000
horizon_years = 10
discount_rate = 0.07
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.expect("parses");
        assert_eq!(cfg.asset.chemistry, "NMC");
        assert_eq!(cfg.simulation.iterations, 2000);
        assert!(cfg.build().is_ok());
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
iterations = 500
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 7
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).expect("parses");
        assert_eq!(cfg.simulation.seed, 7);
        assert_eq!(cfg.simulation.iterations, 1000);
        assert_eq!(cfg.asset.capacity_mwh, 100.0);
        assert_eq!(cfg.apm.annual_fee, ApmConfig::advanced().annual_fee);
    }

    #[test]
    fn bad_chemistry_reports_field_path() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.asset.chemistry = "NCA".to_string();
        let err = cfg.build().unwrap_err();
        assert_eq!(err.field, "asset.chemistry");
    }

    #[test]
    fn invalid_capacity_reports_field_path() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.asset.capacity_mwh = 0.0;
        let err = cfg.build().unwrap_err();
        assert_eq!(err.field, "asset.capacity_mwh");
    }
}
