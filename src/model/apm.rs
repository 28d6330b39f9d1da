use super::ValidationError;

/// Costs and benefit factors of an Asset Performance Management platform.
///
/// Benefit factors are fractions in [0, 1]. The zero-benefit, zero-cost
/// variant from [`ApmPlatformSpec::none`] serves as the baseline scenario
/// and must behave as a strict no-op in the simulation.
#[derive(Debug, Clone)]
pub struct ApmPlatformSpec {
    /// Annual subscription fee in currency units.
    pub annual_fee: f64,
    /// One-time implementation cost charged in year 0.
    pub implementation_cost: f64,
    /// Fractional reduction of unplanned downtime from predictive maintenance.
    pub downtime_reduction: f64,
    /// Fractional uplift on gross dispatch revenue.
    pub dispatch_uplift: f64,
    /// Fractional reduction of the annual degradation rate.
    pub degradation_reduction: f64,
    /// Fractional reduction of baseline maintenance cost.
    pub maintenance_reduction: f64,
}

impl ApmPlatformSpec {
    /// Creates a validated platform specification.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when a cost is negative or a benefit
    /// factor is outside [0, 1].
    pub fn new(
        annual_fee: f64,
        implementation_cost: f64,
        downtime_reduction: f64,
        dispatch_uplift: f64,
        degradation_reduction: f64,
        maintenance_reduction: f64,
    ) -> Result<Self, ValidationError> {
        let spec = Self {
            annual_fee,
            implementation_cost,
            downtime_reduction,
            dispatch_uplift,
            degradation_reduction,
            maintenance_reduction,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// The zero-benefit, zero-cost spec used as the baseline scenario.
    pub fn none() -> Self {
        Self {
            annual_fee: 0.0,
            implementation_cost: 0.0,
            downtime_reduction: 0.0,
            dispatch_uplift: 0.0,
            degradation_reduction: 0.0,
            maintenance_reduction: 0.0,
        }
    }

    /// Checks all field invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a `ValidationError`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.annual_fee.is_finite() || self.annual_fee < 0.0 {
            return Err(ValidationError::new("apm.annual_fee", "must be >= 0"));
        }
        if !self.implementation_cost.is_finite() || self.implementation_cost < 0.0 {
            return Err(ValidationError::new(
                "apm.implementation_cost",
                "must be >= 0",
            ));
        }
        for (field, value) in [
            ("apm.downtime_reduction", self.downtime_reduction),
            ("apm.dispatch_uplift", self.dispatch_uplift),
            ("apm.degradation_reduction", self.degradation_reduction),
            ("apm.maintenance_reduction", self.maintenance_reduction),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::new(field, "must be in [0, 1]"));
            }
        }
        Ok(())
    }
}
