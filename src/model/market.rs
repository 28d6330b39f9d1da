use super::ValidationError;

/// Market conditions driving BESS revenue.
///
/// Immutable after construction.
#[derive(Debug, Clone)]
pub struct MarketConditions {
    /// Average spot price in currency per MWh.
    pub spot_price: f64,
    /// Lognormal sigma of the annual price-noise multiplier (>= 0).
    pub price_volatility: f64,
    /// Average FCAS price in currency per MW per hour.
    pub fcas_price: f64,
    /// Fraction of rated energy actually dispatched (0 to 1).
    pub capacity_factor: f64,
}

impl MarketConditions {
    /// Creates validated market conditions.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when any price is negative, volatility is
    /// negative, or the capacity factor is outside [0, 1].
    pub fn new(
        spot_price: f64,
        price_volatility: f64,
        fcas_price: f64,
        capacity_factor: f64,
    ) -> Result<Self, ValidationError> {
        let market = Self {
            spot_price,
            price_volatility,
            fcas_price,
            capacity_factor,
        };
        market.validate()?;
        Ok(market)
    }

    /// Checks all field invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a `ValidationError`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.spot_price.is_finite() || self.spot_price < 0.0 {
            return Err(ValidationError::new("market.spot_price", "must be >= 0"));
        }
        if !self.price_volatility.is_finite() || self.price_volatility < 0.0 {
            return Err(ValidationError::new(
                "market.price_volatility",
                "must be >= 0",
            ));
        }
        if !self.fcas_price.is_finite() || self.fcas_price < 0.0 {
            return Err(ValidationError::new("market.fcas_price", "must be >= 0"));
        }
        if !self.capacity_factor.is_finite() || !(0.0..=1.0).contains(&self.capacity_factor) {
            return Err(ValidationError::new(
                "market.capacity_factor",
                "must be in [0, 1]",
            ));
        }
        Ok(())
    }
}
