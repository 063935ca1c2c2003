use serde::Serialize;

/// One parameter set as entered in the calculator. Rates are in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentParameters {
    pub initial_amount: f64,
    pub monthly_contribution: f64,
    pub annual_return_percent: f64,
    pub years: f64,
    pub inflation_rate_percent: f64,
}

impl Default for InvestmentParameters {
    fn default() -> Self {
        Self {
            initial_amount: 10_000.0,
            monthly_contribution: 500.0,
            annual_return_percent: 7.0,
            years: 20.0,
            inflation_rate_percent: 2.5,
        }
    }
}

/// Rounded snapshot taken at every whole year of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyDataPoint {
    pub year: u32,
    pub month: u32,
    pub total_value: f64,
    pub total_contributed: f64,
    pub interest_earned: f64,
    pub real_value: f64,
}

/// Scalar fields hold the unrounded state of the last simulated month, so
/// they can differ from the rounded fields of the last series entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub series: Vec<YearlyDataPoint>,
    pub final_value: f64,
    pub total_contributed: f64,
    pub total_interest: f64,
    pub total_real_value: f64,
    pub crossover_point: Option<YearlyDataPoint>,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPreset {
    pub name: String,
    pub return_percent: f64,
    pub color: String,
}

impl ScenarioPreset {
    pub fn new(name: &str, return_percent: f64, color: &str) -> Self {
        Self {
            name: name.to_string(),
            return_percent,
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub name: String,
    pub final_value: f64,
    pub total_contributed: f64,
    pub interest: f64,
    pub return_percent: f64,
    pub color: String,
}

impl ScenarioResult {
    /// How many times the contributed capital the scenario ends with.
    pub fn multiplier(&self) -> f64 {
        self.final_value / self.total_contributed
    }
}

pub fn default_presets() -> Vec<ScenarioPreset> {
    vec![
        ScenarioPreset::new("Conservative", 4.0, "#10b981"),
        ScenarioPreset::new("Moderate", 7.0, "#3b82f6"),
        ScenarioPreset::new("Aggressive", 10.0, "#f59e0b"),
    ]
}
