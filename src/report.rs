//! Terminal rendering of a projection response.

use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};

use crate::api::ProjectResponse;
use crate::core::round_half_up;

const CURRENCY: &str = "EUR";

/// Whole units with `,` grouping. Non-finite values print as-is.
pub fn format_currency(amount: f64) -> String {
    let rounded = round_half_up(amount);
    if !rounded.is_finite() {
        return format!("{rounded} {CURRENCY}");
    }
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped} {CURRENCY}")
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    for idx in 1..headers.len() {
        if let Some(column) = t.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    t
}

pub fn render(response: &ProjectResponse) -> String {
    let params = &response.parameters;
    let projection = &response.projection;
    let insights = &response.insights;

    let metrics = pretty_table(
        &["Metric", "Value"],
        vec![
            vec!["Final value".into(), format_currency(projection.final_value)],
            vec![
                "Total contributed".into(),
                format_currency(projection.total_contributed),
            ],
            vec!["Interest".into(), format_currency(projection.total_interest)],
            vec!["ROI".into(), format_percent(projection.roi)],
        ],
    );

    let crossover = match projection.crossover_point {
        Some(point) => format!(
            "  Crossover: in year {}, interest ({}) exceeds contributed capital ({}).",
            point.year,
            format_currency(point.interest_earned),
            format_currency(point.total_contributed)
        ),
        None => format!(
            "  Crossover: interest does not overtake contributed capital within {} years.",
            params.years
        ),
    };

    let mut lines = vec![
        "Key metrics".to_string(),
        metrics.to_string(),
        String::new(),
        "Insights".to_string(),
        crossover,
        format!(
            "  Compounding: {} of the final value is interest.",
            format_percent(insights.interest_share_percent)
        ),
        format!(
            "  Real value: with {}% inflation the portfolio is worth {} in today's money.",
            params.inflation_rate_percent,
            format_currency(projection.total_real_value)
        ),
        format!(
            "  Contributions: {} a month is {} a year.",
            format_currency(params.monthly_contribution),
            format_currency(insights.annual_contribution)
        ),
    ];
    lines.extend(insights.composition.iter().map(|slice| {
        format!(
            "  {}: {} ({})",
            slice.name,
            format_currency(slice.value),
            format_percent(slice.share_percent)
        )
    }));

    let scenarios = pretty_table(
        &["Scenario", "Return", "Final value", "Contributed", "Interest", "Multiplier"],
        response
            .scenarios
            .iter()
            .map(|s| {
                vec![
                    s.name.clone(),
                    format!("{}%", s.return_percent),
                    format_currency(s.final_value),
                    format_currency(s.total_contributed),
                    format_currency(s.interest),
                    format!("{:.1}x", s.multiplier()),
                ]
            })
            .collect(),
    );
    lines.extend([String::new(), "Scenarios".to_string(), scenarios.to_string()]);

    let breakdown = pretty_table(
        &["Year", "Total value", "Contributed", "Interest", "Real value"],
        insights
            .breakdown
            .iter()
            .map(|row| {
                let year = if row.is_crossover {
                    format!("{} *", row.point.year)
                } else {
                    row.point.year.to_string()
                };
                vec![
                    year,
                    format_currency(row.point.total_value),
                    format_currency(row.point.total_contributed),
                    format_currency(row.point.interest_earned),
                    format_currency(row.point.real_value),
                ]
            })
            .collect(),
    );
    lines.extend([String::new(), "Year-by-year".to_string(), breakdown.to_string()]);
    if insights.breakdown.iter().any(|row| row.is_crossover) {
        lines.push("* crossover year".to_string());
    }
    lines.join("\n")
}
