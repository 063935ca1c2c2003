mod engine;
mod input;
mod insights;
mod types;

pub use engine::{compare_scenarios, project};
pub use input::{coerce_number, parse_number_or_zero, round_half_up};
pub use insights::{BreakdownRow, CompositionSlice, ProjectionInsights, insights};
pub use types::{
    InvestmentParameters, ProjectionResult, ScenarioPreset, ScenarioResult, YearlyDataPoint,
    default_presets,
};
