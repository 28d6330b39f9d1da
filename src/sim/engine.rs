//! Year-stepped degradation and dispatch simulation of one scenario.
//!
//! One engine instance advances a single scenario (baseline or APM) over
//! a borrowed draw path. The baseline scenario is simply the same engine
//! run with [`ApmPlatformSpec::none`] on the same path, so every benefit
//! factor enters as a multiplicative adjustment that vanishes at zero.

use crate::model::{ApmPlatformSpec, BessAsset, MarketConditions};

use super::draws::{DrawPath, YearDraws};

/// Base annual unplanned-downtime fraction without APM.
const BASE_UNPLANNED_DOWNTIME: f64 = 0.05;
/// Additional downtime fraction in a year with a failure event.
const FAILURE_OUTAGE_FRACTION: f64 = 0.15;
/// Fraction of hours the asset provides FCAS.
const FCAS_DUTY_FRACTION: f64 = 0.30;
/// Baseline annual maintenance cost as a fraction of capital cost.
const MAINTENANCE_COST_FRACTION: f64 = 0.03;
/// Maintenance cost multiplier slope per unit of lost capacity.
const WEAR_COST_FACTOR: f64 = 0.5;
/// Repair cost of a failure event as a fraction of capital cost.
const FAILURE_REPAIR_FRACTION: f64 = 0.10;

/// State of one scenario after one simulated year.
#[derive(Debug, Clone, Copy)]
pub struct YearRecord {
    /// Year index, starting at 1 (index 0 of the cash flows is the outlay).
    pub year: usize,
    /// Remaining capacity fraction after this year's fade.
    pub capacity_frac: f64,
    /// Availability fraction achieved this year.
    pub availability: f64,
    /// Gross dispatch revenue earned this year.
    pub revenue: f64,
    /// Operating cost incurred this year.
    pub opex: f64,
}

/// Completed per-iteration trajectory of one scenario.
///
/// `cash_flows` has length `years.len() + 1`; index 0 carries the
/// (negative) implementation outlay.
#[derive(Debug, Clone)]
pub struct ScenarioPath {
    pub years: Vec<YearRecord>,
    pub cash_flows: Vec<f64>,
}

impl ScenarioPath {
    /// Remaining capacity fraction at the end of the horizon.
    pub fn final_capacity_frac(&self) -> f64 {
        self.years.last().map_or(1.0, |r| r.capacity_frac)
    }

    /// Mean availability over the horizon.
    pub fn mean_availability(&self) -> f64 {
        if self.years.is_empty() {
            return 0.0;
        }
        self.years.iter().map(|r| r.availability).sum::<f64>() / self.years.len() as f64
    }

    /// Total undiscounted revenue over the horizon.
    pub fn total_revenue(&self) -> f64 {
        self.years.iter().map(|r| r.revenue).sum()
    }

    /// Total undiscounted operating cost over the horizon.
    pub fn total_opex(&self) -> f64 {
        self.years.iter().map(|r| r.opex).sum()
    }
}

/// Simulates one scenario year-by-year, tracking capacity fade, cycle
/// count, and annual cash flows.
#[derive(Debug, Clone)]
pub struct ScenarioEngine<'a> {
    asset: &'a BessAsset,
    market: &'a MarketConditions,
    spec: &'a ApmPlatformSpec,
    capacity_frac: f64,
    cycles: f64,
}

impl<'a> ScenarioEngine<'a> {
    /// Creates an engine at full health (capacity fraction 1.0, zero
    /// cycles). Pass [`ApmPlatformSpec::none`] for the baseline scenario.
    pub fn new(
        asset: &'a BessAsset,
        market: &'a MarketConditions,
        spec: &'a ApmPlatformSpec,
    ) -> Self {
        Self {
            asset,
            market,
            spec,
            capacity_frac: 1.0,
            cycles: 0.0,
        }
    }

    /// Remaining capacity fraction, in [0, 1].
    pub fn capacity_frac(&self) -> f64 {
        self.capacity_frac
    }

    /// Cumulative equivalent full cycles performed so far.
    pub fn cycles(&self) -> f64 {
        self.cycles
    }

    /// Equivalent full cycles per year implied by the capacity factor.
    fn annual_cycles(&self) -> f64 {
        self.market.capacity_factor * 365.0
    }

    /// Deterministic annual fade rate before noise: chemistry calendar
    /// fade plus cycle wear scaled by cycling intensity, discounted by
    /// the degradation-reduction benefit.
    fn deterministic_fade_rate(&self) -> f64 {
        let chem = self.asset.chemistry;
        let cycle_fade =
            chem.cycle_wear_fraction() * self.annual_cycles() / self.asset.cycle_life as f64;
        (chem.calendar_fade_rate() + cycle_fade) * (1.0 - self.spec.degradation_reduction)
    }

    /// Failure probability after the predictive-maintenance benefit.
    fn failure_probability(&self) -> f64 {
        self.asset.chemistry.failure_probability() * (1.0 - self.spec.downtime_reduction)
    }

    /// Advances the scenario by one year and returns its record.
    ///
    /// `year` is 1-based; it only labels the record. A retired asset
    /// (capacity fraction at zero) produces an all-zero year.
    pub fn step(&mut self, year: usize, draws: &YearDraws) -> YearRecord {
        // Degradation: deterministic rate plus noise, fade never negative.
        let fade = (self.deterministic_fade_rate() + draws.degradation_noise).max(0.0);
        self.capacity_frac = (self.capacity_frac - fade).clamp(0.0, 1.0);

        if self.capacity_frac <= 0.0 {
            // Retired: no dispatch, no maintenance, contracts terminated.
            self.capacity_frac = 0.0;
            return YearRecord {
                year,
                capacity_frac: 0.0,
                availability: 0.0,
                revenue: 0.0,
                opex: 0.0,
            };
        }

        // Availability: reduced unplanned downtime, plus a fixed outage
        // when the failure event triggers on this scenario's probability.
        let failed = draws.failure_u < self.failure_probability();
        let mut downtime = BASE_UNPLANNED_DOWNTIME * (1.0 - self.spec.downtime_reduction);
        if failed {
            downtime += FAILURE_OUTAGE_FRACTION;
        }
        let availability = (1.0 - downtime).clamp(0.0, 1.0);

        self.cycles += self.annual_cycles() * availability;

        // Revenue: energy term on remaining capacity, FCAS term on rated
        // power, both availability-scaled, then the dispatch uplift.
        let energy_revenue = self.asset.capacity_mwh
            * self.capacity_frac
            * self.market.capacity_factor
            * 365.0
            * self.asset.round_trip_efficiency
            * self.market.spot_price
            * draws.price_multiplier;
        let fcas_revenue =
            self.asset.power_mw * self.market.fcas_price * 24.0 * 365.0 * FCAS_DUTY_FRACTION;
        let revenue =
            (energy_revenue + fcas_revenue) * availability * (1.0 + self.spec.dispatch_uplift);

        // Opex: maintenance grows with wear, shrinks with the benefit;
        // the platform fee and any failure repair come on top.
        let mut opex = self.asset.capital_cost
            * MAINTENANCE_COST_FRACTION
            * (1.0 - self.spec.maintenance_reduction)
            * (1.0 + (1.0 - self.capacity_frac) * WEAR_COST_FACTOR)
            + self.spec.annual_fee;
        if failed {
            opex += self.asset.capital_cost * FAILURE_REPAIR_FRACTION;
        }

        YearRecord {
            year,
            capacity_frac: self.capacity_frac,
            availability,
            revenue,
            opex,
        }
    }

    /// Runs the scenario over the whole draw path and returns its
    /// trajectory, cash flows included (index 0 = implementation outlay).
    pub fn run(mut self, path: &DrawPath) -> ScenarioPath {
        let mut years = Vec::with_capacity(path.years.len());
        let mut cash_flows = Vec::with_capacity(path.years.len() + 1);
        cash_flows.push(-self.spec.implementation_cost);

        for (idx, draws) in path.years.iter().enumerate() {
            let record = self.step(idx + 1, draws);
            cash_flows.push(record.revenue - record.opex);
            years.push(record);
        }

        ScenarioPath { years, cash_flows }
    }
}
