//! Heavy-truck charging site planner.
//!
//! Sizes a charging site from its dimensions, then projects capital cost,
//! revenue and payback. [`plan::calc_plan`] evaluates one scenario;
//! [`sensitivity::SensitivityGrid`] sweeps energy, fee and rent around it.

pub mod config;
pub mod io;
pub mod logging;
pub mod plan;
pub mod report;
pub mod sensitivity;
