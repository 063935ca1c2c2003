use serde::Serialize;

use super::types::{InvestmentParameters, ProjectionResult, YearlyDataPoint};

/// Number of leading years shown in the breakdown table.
pub const BREAKDOWN_ROWS: usize = 11;

const CONTRIBUTED_COLOR: &str = "#94a3b8";
const INTEREST_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionSlice {
    pub name: &'static str,
    pub value: f64,
    pub share_percent: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownRow {
    #[serde(flatten)]
    pub point: YearlyDataPoint,
    pub is_crossover: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInsights {
    pub interest_share_percent: f64,
    pub annual_contribution: f64,
    pub composition: [CompositionSlice; 2],
    pub breakdown: Vec<BreakdownRow>,
}

/// Ratios are left unguarded: a zero final value gives a NaN share.
pub fn insights(params: &InvestmentParameters, result: &ProjectionResult) -> ProjectionInsights {
    let composition_total = result.total_contributed + result.total_interest;
    let slice = |name, value: f64, color| CompositionSlice {
        name,
        value,
        share_percent: value / composition_total * 100.0,
        color,
    };
    let crossover_year = result.crossover_point.map(|p| p.year);

    ProjectionInsights {
        interest_share_percent: result.total_interest / result.final_value * 100.0,
        annual_contribution: params.monthly_contribution * 12.0,
        composition: [
            slice("Contributed capital", result.total_contributed, CONTRIBUTED_COLOR),
            slice("Interest earned", result.total_interest, INTEREST_COLOR),
        ],
        breakdown: result
            .series
            .iter()
            .take(BREAKDOWN_ROWS)
            .map(|point| BreakdownRow {
                point: *point,
                is_crossover: crossover_year == Some(point.year),
            })
            .collect(),
    }
}
