//! Financial metrics computed from a completed cash-flow sequence.
//!
//! Cash flows are indexed by year, with index 0 holding the up-front
//! outlay. IRR and payback can legitimately not exist for a given
//! sequence; both are modeled as `None` rather than errors, and
//! aggregate statistics skip them.

/// Lower bound of the IRR bisection bracket (-99% per year).
const IRR_RATE_MIN: f64 = -0.99;
/// Upper bound of the IRR bisection bracket (+1000% per year).
const IRR_RATE_MAX: f64 = 10.0;
/// Maximum bisection iterations before giving up.
const IRR_MAX_ITERATIONS: usize = 128;
/// NPV magnitude below which the bisection accepts a root.
const IRR_TOLERANCE: f64 = 1e-7;

/// Net present value of a cash-flow sequence at the given annual
/// discount rate. Index 0 is undiscounted.
pub fn npv(cash_flows: &[f64], rate: f64) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(year, cf)| cf / (1.0 + rate).powi(year as i32))
        .sum()
}

/// Internal rate of return: the discount rate at which NPV is zero.
///
/// Found by bisection over a fixed bracket (-99% to +1000% per year)
/// with a fixed iteration cap. Returns `None` when the cash flows have
/// no sign change (all non-negative or all non-positive) or the bracket
/// does not straddle a root; this is a distinct result state, not an
/// error.
pub fn irr(cash_flows: &[f64]) -> Option<f64> {
    let any_positive = cash_flows.iter().any(|&cf| cf > 0.0);
    let any_negative = cash_flows.iter().any(|&cf| cf < 0.0);
    if !any_positive || !any_negative {
        return None;
    }

    let mut lo = IRR_RATE_MIN;
    let mut hi = IRR_RATE_MAX;
    let f_lo = npv(cash_flows, lo);
    let f_hi = npv(cash_flows, hi);
    if f_lo.abs() < IRR_TOLERANCE {
        return Some(lo);
    }
    if f_hi.abs() < IRR_TOLERANCE {
        return Some(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return None;
    }

    for _ in 0..IRR_MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let f_mid = npv(cash_flows, mid);
        if f_mid.abs() < IRR_TOLERANCE {
            return Some(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Some(0.5 * (lo + hi))
}

/// First year index at which the undiscounted cumulative cash flow
/// becomes non-negative, or `None` when it never does within the
/// sequence (payback beyond horizon).
pub fn payback_year(cash_flows: &[f64]) -> Option<usize> {
    let mut cumulative = 0.0;
    for (year, cf) in cash_flows.iter().enumerate() {
        cumulative += cf;
        if cumulative >= 0.0 {
            return Some(year);
        }
    }
    None
}

/// Financial outcome of one scenario in one iteration. Immutable.
#[derive(Debug, Clone)]
pub struct FinancialResult {
    /// Net present value at the configured discount rate.
    pub npv: f64,
    /// Internal rate of return; `None` when undefined or non-convergent.
    pub irr: Option<f64>,
    /// Payback year index; `None` when beyond the horizon.
    pub payback_year: Option<usize>,
    /// Undiscounted cumulative cash flow at the end of the horizon.
    pub terminal_value: f64,
}

impl FinancialResult {
    /// Computes all metrics from a completed cash-flow sequence.
    pub fn from_cash_flows(cash_flows: &[f64], discount_rate: f64) -> Self {
        Self {
            npv: npv(cash_flows, discount_rate),
            irr: irr(cash_flows),
            payback_year: payback_year(cash_flows),
            terminal_value: cash_flows.iter().sum(),
        }
    }
}
