use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Battery cell chemistry, carrying the degradation and failure calibration
/// constants the simulation derives its annual rates from.
///
/// The constants are calibration data, tuned so that the default asset
/// (0.35 capacity factor, 6000-cycle design life) fades at roughly 2% per
/// year on LFP, and so that failure events stay rare enough for the APM
/// benefit bands to matter without dominating the cash flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chemistry {
    /// Lithium iron phosphate.
    Lfp,
    /// Nickel manganese cobalt.
    Nmc,
    /// Lithium titanate.
    Lto,
}

impl Chemistry {
    /// Annual calendar fade rate (capacity fraction lost per year at rest).
    pub fn calendar_fade_rate(self) -> f64 {
        match self {
            Chemistry::Lfp => 0.015,
            Chemistry::Nmc => 0.021,
            Chemistry::Lto => 0.007,
        }
    }

    /// Capacity fraction lost to cycling over one full design cycle life.
    pub fn cycle_wear_fraction(self) -> f64 {
        match self {
            Chemistry::Lfp => 0.20,
            Chemistry::Nmc => 0.25,
            Chemistry::Lto => 0.15,
        }
    }

    /// Annual probability of an unplanned major failure event.
    pub fn failure_probability(self) -> f64 {
        match self {
            Chemistry::Lfp => 0.010,
            Chemistry::Nmc => 0.015,
            Chemistry::Lto => 0.006,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Chemistry::Lfp => "LFP",
            Chemistry::Nmc => "NMC",
            Chemistry::Lto => "LTO",
        }
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Chemistry {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LFP" => Ok(Chemistry::Lfp),
            "NMC" => Ok(Chemistry::Nmc),
            "LTO" => Ok(Chemistry::Lto),
            other => Err(ValidationError::new(
                "chemistry",
                format!("must be \"LFP\", \"NMC\" or \"LTO\", got \"{other}\""),
            )),
        }
    }
}

/// A grid-scale battery energy storage system asset.
///
/// Immutable after construction; all simulation components take it by
/// shared reference.
#[derive(Debug, Clone)]
pub struct BessAsset {
    /// Total energy capacity in MWh.
    pub capacity_mwh: f64,
    /// Maximum power output in MW.
    pub power_mw: f64,
    /// Battery cell chemistry.
    pub chemistry: Chemistry,
    /// Round-trip efficiency (0, 1].
    pub round_trip_efficiency: f64,
    /// Initial capital cost in currency units.
    pub capital_cost: f64,
    /// Design cycle life (equivalent full cycles until end of life).
    pub cycle_life: u32,
}

impl BessAsset {
    /// Creates a validated asset description.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when capacity or power is not positive,
    /// efficiency is outside (0, 1], capital cost is negative, or the
    /// cycle life is zero.
    pub fn new(
        capacity_mwh: f64,
        power_mw: f64,
        chemistry: Chemistry,
        round_trip_efficiency: f64,
        capital_cost: f64,
        cycle_life: u32,
    ) -> Result<Self, ValidationError> {
        let asset = Self {
            capacity_mwh,
            power_mw,
            chemistry,
            round_trip_efficiency,
            capital_cost,
            cycle_life,
        };
        asset.validate()?;
        Ok(asset)
    }

    /// Checks all field invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a `ValidationError`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.capacity_mwh.is_finite() || self.capacity_mwh <= 0.0 {
            return Err(ValidationError::new("asset.capacity_mwh", "must be > 0"));
        }
        if !self.power_mw.is_finite() || self.power_mw <= 0.0 {
            return Err(ValidationError::new("asset.power_mw", "must be > 0"));
        }
        if !self.round_trip_efficiency.is_finite()
            || self.round_trip_efficiency <= 0.0
            || self.round_trip_efficiency > 1.0
        {
            return Err(ValidationError::new(
                "asset.round_trip_efficiency",
                "must be in (0, 1]",
            ));
        }
        if !self.capital_cost.is_finite() || self.capital_cost < 0.0 {
            return Err(ValidationError::new("asset.capital_cost", "must be >= 0"));
        }
        if self.cycle_life == 0 {
            return Err(ValidationError::new("asset.cycle_life", "must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_asset() -> Result<BessAsset, ValidationError> {
        BessAsset::new(100.0, 50.0, Chemistry::Lfp, 0.85, 80_000_000.0, 6000)
    }

    #[test]
    fn valid_asset_constructs() {
        assert!(valid_asset().is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = BessAsset::new(0.0, 50.0, Chemistry::Lfp, 0.85, 80e6, 6000);
        assert_eq!(err.unwrap_err().field, "asset.capacity_mwh");
    }

    #[test]
    fn negative_power_rejected() {
        let err = BessAsset::new(100.0, -1.0, Chemistry::Lfp, 0.85, 80e6, 6000);
        assert_eq!(err.unwrap_err().field, "asset.power_mw");
    }

    #[test]
    fn efficiency_above_one_rejected() {
        let err = BessAsset::new(100.0, 50.0, Chemistry::Lfp, 1.01, 80e6, 6000);
        assert_eq!(err.unwrap_err().field, "asset.round_trip_efficiency");
    }

    #[test]
    fn efficiency_zero_rejected() {
        let err = BessAsset::new(100.0, 50.0, Chemistry::Lfp, 0.0, 80e6, 6000);
        assert!(err.is_err());
    }

    #[test]
    fn negative_capital_cost_rejected() {
        let err = BessAsset::new(100.0, 50.0, Chemistry::Lfp, 0.85, -1.0, 6000);
        assert_eq!(err.unwrap_err().field, "asset.capital_cost");
    }

    #[test]
    fn zero_cycle_life_rejected() {
        let err = BessAsset::new(100.0, 50.0, Chemistry::Lfp, 0.85, 80e6, 0);
        assert_eq!(err.unwrap_err().field, "asset.cycle_life");
    }

    #[test]
    fn chemistry_parses_case_insensitively() {
        assert_eq!("lfp".parse::<Chemistry>().ok(), Some(Chemistry::Lfp));
        assert_eq!("NMC".parse::<Chemistry>().ok(), Some(Chemistry::Nmc));
        assert_eq!("Lto".parse::<Chemistry>().ok(), Some(Chemistry::Lto));
        assert!("NCA".parse::<Chemistry>().is_err());
    }

    #[test]
    fn chemistry_constants_are_sane_fractions() {
        for chem in [Chemistry::Lfp, Chemistry::Nmc, Chemistry::Lto] {
            assert!(chem.calendar_fade_rate() > 0.0 && chem.calendar_fade_rate() < 0.1);
            assert!(chem.cycle_wear_fraction() > 0.0 && chem.cycle_wear_fraction() < 1.0);
            assert!(chem.failure_probability() > 0.0 && chem.failure_probability() < 0.1);
        }
    }
}
