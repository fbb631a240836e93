/// Planning calculator entry points.
pub mod calculator;
/// Lenient input record.
pub mod input;
/// Width bands and stall layout.
pub mod layout;
pub mod types;

pub use calculator::{calc_plan, calc_plan_with};
pub use input::PlanInput;
pub use types::PlanResult;
