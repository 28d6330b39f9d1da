//! Monte Carlo simulation core: stochastic draws, the per-scenario
//! degradation and dispatch engine, the trial orchestrator, and the
//! comparative results aggregate.

pub mod draws;
pub mod engine;
pub mod monte_carlo;
pub mod results;
