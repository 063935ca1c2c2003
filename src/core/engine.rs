use tracing::debug;

use super::input::round_half_up;
use super::types::{
    InvestmentParameters, ProjectionResult, ScenarioPreset, ScenarioResult, YearlyDataPoint,
};

const MONTHS_PER_YEAR: u32 = 12;

/// Running balance shared by the projection and the scenario comparison.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    value: f64,
    contributed: f64,
}

impl Accumulator {
    fn new(initial_amount: f64) -> Self {
        Self {
            value: initial_amount,
            contributed: initial_amount,
        }
    }

    /// The contribution lands before the month's growth, so it compounds
    /// in the month it is paid.
    fn step(&mut self, contribution: f64, monthly_rate: f64) {
        self.value += contribution;
        self.contributed += contribution;
        self.value *= 1.0 + monthly_rate;
    }

    fn interest(self) -> f64 {
        self.value - self.contributed
    }
}

fn monthly_rate(annual_percent: f64) -> f64 {
    annual_percent / 100.0 / 12.0
}

/// Last simulated month for a horizon of `years`, or `None` when not even
/// month 0 is reached. Fractional horizons keep every month up to
/// `years * 12`.
fn last_month(years: f64) -> Option<u32> {
    let total_months = years * f64::from(MONTHS_PER_YEAR);
    if total_months >= 0.0 {
        Some(total_months.floor() as u32)
    } else {
        None
    }
}

fn snapshot(month: u32, acc: Accumulator, real_value: f64) -> YearlyDataPoint {
    YearlyDataPoint {
        year: month / MONTHS_PER_YEAR,
        month,
        total_value: round_half_up(acc.value),
        total_contributed: round_half_up(acc.contributed),
        interest_earned: round_half_up(acc.interest()),
        real_value: round_half_up(real_value),
    }
}

pub fn project(params: &InvestmentParameters) -> ProjectionResult {
    let rate = monthly_rate(params.annual_return_percent);
    let inflation_rate = monthly_rate(params.inflation_rate_percent);

    let mut acc = Accumulator::new(params.initial_amount);
    let mut real_value = params.initial_amount;
    let mut series = Vec::new();

    if let Some(last) = last_month(params.years) {
        series.reserve((last / MONTHS_PER_YEAR) as usize + 1);
        for month in 0..=last {
            if month > 0 {
                acc.step(params.monthly_contribution, rate);
                real_value = acc.value / (1.0 + inflation_rate).powf(f64::from(month));
            }
            if month % MONTHS_PER_YEAR == 0 {
                series.push(snapshot(month, acc, real_value));
            }
        }
    }

    let crossover_point = series
        .iter()
        .find(|point| point.interest_earned > point.total_contributed)
        .copied();
    let final_value = acc.value;
    let total_contributed = acc.contributed;
    let roi = (final_value - total_contributed) / total_contributed * 100.0;

    debug!(
        years = params.years,
        points = series.len(),
        final_value,
        crossover_year = crossover_point.map(|p| p.year),
        "projection computed"
    );

    ProjectionResult {
        series,
        final_value,
        total_contributed,
        total_interest: final_value - total_contributed,
        total_real_value: real_value,
        crossover_point,
        roi,
    }
}

pub fn compare_scenarios(
    params: &InvestmentParameters,
    presets: &[ScenarioPreset],
) -> Vec<ScenarioResult> {
    let last = last_month(params.years).unwrap_or(0);
    presets
        .iter()
        .map(|preset| {
            let rate = monthly_rate(preset.return_percent);
            let mut acc = Accumulator::new(params.initial_amount);
            for _ in 1..=last {
                acc.step(params.monthly_contribution, rate);
            }
            ScenarioResult {
                name: preset.name.clone(),
                final_value: round_half_up(acc.value),
                total_contributed: round_half_up(acc.contributed),
                interest: round_half_up(acc.interest()),
                return_percent: preset.return_percent,
                color: preset.color.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::default_presets;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn sample_params() -> InvestmentParameters {
        InvestmentParameters::default()
    }

    /// Future value of an initial lump sum plus contributions paid at the
    /// start of each month.
    fn closed_form_value(params: &InvestmentParameters, months: u32) -> f64 {
        let r = monthly_rate(params.annual_return_percent);
        let n = f64::from(months);
        let growth = (1.0 + r).powf(n);
        params.initial_amount * growth + params.monthly_contribution * (1.0 + r) * (growth - 1.0) / r
    }

    #[test]
    fn default_projection_starts_at_initial_amount() {
        let result = project(&sample_params());
        let first = result.series[0];

        assert_eq!(first.year, 0);
        assert_eq!(first.month, 0);
        assert_eq!(first.total_value, 10_000.0);
        assert_eq!(first.total_contributed, 10_000.0);
        assert_eq!(first.real_value, 10_000.0);
        assert_eq!(first.interest_earned, 0.0);
    }

    #[test]
    fn default_projection_matches_closed_form() {
        let params = sample_params();
        let result = project(&params);
        let expected = closed_form_value(&params, 240);

        assert_approx_tol(result.final_value, expected, 1e-6 * expected);
        let last = result.series.last().copied().expect("series not empty");
        assert_eq!(last.year, 20);
        assert_eq!(last.month, 240);
        assert_approx_tol(last.total_value, expected, 1.0);
        assert_eq!(last.total_contributed, 130_000.0);
        assert_approx_tol(result.total_contributed, 130_000.0, 1e-9);
        assert_approx_tol(
            result.total_interest,
            result.final_value - result.total_contributed,
            1e-9,
        );
    }

    #[test]
    fn real_value_deflates_by_monthly_inflation() {
        let params = sample_params();
        let result = project(&params);
        let deflator = (1.0 + 0.025 / 12.0_f64).powf(240.0);

        assert_approx_tol(result.total_real_value, result.final_value / deflator, 1e-6);
        assert!(result.total_real_value < result.final_value);
    }

    #[test]
    fn scalar_fields_are_not_rounded() {
        let result = project(&sample_params());
        let last = result.series.last().copied().expect("series not empty");

        assert_ne!(result.final_value.fract(), 0.0);
        assert_eq!(last.total_value, round_half_up(result.final_value));
    }

    #[test]
    fn contribution_is_added_before_growth() {
        let params = InvestmentParameters {
            initial_amount: 0.0,
            monthly_contribution: 100.0,
            annual_return_percent: 12.0,
            years: 1.0,
            inflation_rate_percent: 0.0,
        };
        let result = project(&params);

        // Growth applies to the fresh contribution: 100 * 1.01 after month one.
        assert_approx_tol(result.final_value, closed_form_value(&params, 12), 1e-9);
        assert_approx_tol(result.final_value, 1_280.93, 0.01);
    }

    #[test]
    fn crossover_is_first_year_interest_beats_capital() {
        let params = InvestmentParameters {
            initial_amount: 10_000.0,
            monthly_contribution: 0.0,
            annual_return_percent: 10.0,
            years: 15.0,
            inflation_rate_percent: 0.0,
        };
        let result = project(&params);
        let crossover = result.crossover_point.expect("10% doubles within 15 years");

        // (1 + 0.1/12)^(12 * 7) ~= 2.007, the value doubles during year 7.
        assert_eq!(crossover.year, 7);
        assert!(crossover.interest_earned > crossover.total_contributed);
        assert!(result.series[6].interest_earned <= result.series[6].total_contributed);
    }

    #[test]
    fn default_projection_crosses_over_in_year_seventeen() {
        let result = project(&sample_params());
        let crossover = result.crossover_point.expect("crossover within 20 years");

        assert_eq!(crossover.year, 17);
        assert_eq!(crossover.total_contributed, 112_000.0);
    }

    #[test]
    fn zero_capital_yields_nan_roi() {
        let params = InvestmentParameters {
            initial_amount: 0.0,
            monthly_contribution: 0.0,
            ..sample_params()
        };
        let result = project(&params);

        assert!(result.roi.is_nan());
        assert_eq!(result.final_value, 0.0);
        assert_eq!(result.series.len(), 21);
    }

    #[test]
    fn zero_contributed_with_gain_yields_infinite_roi() {
        let params = InvestmentParameters {
            initial_amount: 1_200.0,
            monthly_contribution: -100.0,
            annual_return_percent: 12.0,
            years: 1.0,
            inflation_rate_percent: 0.0,
        };
        let result = project(&params);

        assert_eq!(result.total_contributed, 0.0);
        assert!(result.final_value > 0.0);
        assert_eq!(result.roi, f64::INFINITY);
    }

    #[test]
    fn fractional_years_use_real_loop_bound() {
        let params = InvestmentParameters {
            years: 1.55,
            ..sample_params()
        };
        let result = project(&params);

        // Months 0..=18 are simulated, snapshots at 0 and 12 only.
        assert_eq!(result.series.len(), 2);
        assert_approx_tol(result.total_contributed, 10_000.0 + 18.0 * 500.0, 1e-9);
    }

    #[test]
    fn negative_years_simulate_nothing() {
        let params = InvestmentParameters {
            years: -1.0,
            ..sample_params()
        };
        let result = project(&params);

        assert!(result.series.is_empty());
        assert!(result.crossover_point.is_none());
        assert_eq!(result.final_value, 10_000.0);
        assert_eq!(result.total_real_value, 10_000.0);
        assert_eq!(result.roi, 0.0);
    }

    #[test]
    fn zero_years_keep_single_snapshot() {
        let params = InvestmentParameters {
            years: 0.0,
            ..sample_params()
        };
        let result = project(&params);

        assert_eq!(result.series.len(), 1);
        assert_eq!(result.final_value, 10_000.0);
    }

    #[test]
    fn scenarios_follow_the_projection_recurrence() {
        let params = sample_params();
        let presets = default_presets();
        let results = compare_scenarios(&params, &presets);

        assert_eq!(results.len(), 3);
        let moderate = &results[1];
        let projection = project(&params);
        assert_eq!(moderate.name, "Moderate");
        assert_eq!(moderate.return_percent, 7.0);
        assert_eq!(moderate.color, "#3b82f6");
        assert_eq!(moderate.final_value, round_half_up(projection.final_value));
        assert_eq!(moderate.total_contributed, 130_000.0);
        assert_eq!(
            moderate.interest,
            round_half_up(projection.final_value - projection.total_contributed)
        );
    }

    #[test]
    fn scenarios_with_zero_years_return_initial_amount() {
        let params = InvestmentParameters {
            years: 0.0,
            ..sample_params()
        };
        let results = compare_scenarios(&params, &default_presets());
        for scenario in results {
            assert_eq!(scenario.final_value, 10_000.0);
            assert_eq!(scenario.interest, 0.0);
        }
    }

    #[test]
    fn scenarios_with_no_presets_are_empty() {
        assert!(compare_scenarios(&sample_params(), &[]).is_empty());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_projection_is_deterministic(
            initial in 0u32..1_000_000,
            contribution in 0u32..10_000,
            return_bp in -1_000i32..2_000,
            years in 0u32..51,
            inflation_bp in -500i32..1_500
        ) {
            let params = InvestmentParameters {
                initial_amount: f64::from(initial),
                monthly_contribution: f64::from(contribution),
                annual_return_percent: f64::from(return_bp) / 100.0,
                years: f64::from(years),
                inflation_rate_percent: f64::from(inflation_bp) / 100.0,
            };
            let a = project(&params);
            let b = project(&params);

            prop_assert_eq!(a.series.len(), b.series.len());
            for (x, y) in a.series.iter().zip(&b.series) {
                prop_assert_eq!(x.total_value.to_bits(), y.total_value.to_bits());
                prop_assert_eq!(x.real_value.to_bits(), y.real_value.to_bits());
            }
            prop_assert_eq!(a.final_value.to_bits(), b.final_value.to_bits());
            prop_assert_eq!(a.total_real_value.to_bits(), b.total_real_value.to_bits());
            prop_assert_eq!(a.roi.to_bits(), b.roi.to_bits());
        }

        #[test]
        fn prop_series_has_one_point_per_year(
            initial in 0u32..100_000,
            contribution in 0u32..5_000,
            years in 0u32..51
        ) {
            let params = InvestmentParameters {
                initial_amount: f64::from(initial),
                monthly_contribution: f64::from(contribution),
                years: f64::from(years),
                ..sample_params()
            };
            let result = project(&params);

            prop_assert_eq!(result.series.len(), years as usize + 1);
            for (idx, point) in result.series.iter().enumerate() {
                prop_assert_eq!(point.year as usize, idx);
                prop_assert_eq!(point.month, point.year * 12);
            }
        }

        #[test]
        fn prop_contributions_never_decrease(
            initial in 0u32..100_000,
            contribution in 0u32..5_000,
            years in 1u32..51
        ) {
            let params = InvestmentParameters {
                initial_amount: f64::from(initial),
                monthly_contribution: f64::from(contribution),
                years: f64::from(years),
                ..sample_params()
            };
            let result = project(&params);

            for pair in result.series.windows(2) {
                prop_assert!(pair[1].total_contributed >= pair[0].total_contributed);
            }
            let expected = f64::from(initial) + f64::from(contribution) * f64::from(years * 12);
            prop_assert!((result.total_contributed - expected).abs() <= 1e-6 * expected.max(1.0));
        }

        #[test]
        fn prop_zero_contribution_keeps_capital_flat(
            initial in 0u32..1_000_000,
            return_bp in 0i32..2_000,
            years in 0u32..51
        ) {
            let params = InvestmentParameters {
                initial_amount: f64::from(initial),
                monthly_contribution: 0.0,
                annual_return_percent: f64::from(return_bp) / 100.0,
                years: f64::from(years),
                inflation_rate_percent: 2.0,
            };
            let result = project(&params);

            for point in &result.series {
                prop_assert_eq!(point.total_contributed, f64::from(initial));
            }
        }

        #[test]
        fn prop_crossover_is_minimal(
            initial in 0u32..200_000,
            contribution in 0u32..3_000,
            return_bp in 0i32..2_500,
            years in 1u32..51
        ) {
            let params = InvestmentParameters {
                initial_amount: f64::from(initial),
                monthly_contribution: f64::from(contribution),
                annual_return_percent: f64::from(return_bp) / 100.0,
                years: f64::from(years),
                inflation_rate_percent: 0.0,
            };
            let result = project(&params);

            match result.crossover_point {
                Some(crossover) => {
                    prop_assert!(crossover.interest_earned > crossover.total_contributed);
                    for point in result.series.iter().take_while(|p| p.year < crossover.year) {
                        prop_assert!(point.interest_earned <= point.total_contributed);
                    }
                }
                None => {
                    for point in &result.series {
                        prop_assert!(point.interest_earned <= point.total_contributed);
                    }
                }
            }
        }

        #[test]
        fn prop_scenarios_preserve_preset_order(
            rates in proptest::collection::vec(-500i32..2_000, 0..8),
            years in 0u32..51
        ) {
            let presets: Vec<ScenarioPreset> = rates
                .iter()
                .enumerate()
                .map(|(idx, bp)| {
                    ScenarioPreset::new(&format!("preset-{idx}"), f64::from(*bp) / 100.0, "#000000")
                })
                .collect();
            let params = InvestmentParameters {
                years: f64::from(years),
                ..sample_params()
            };
            let results = compare_scenarios(&params, &presets);

            prop_assert_eq!(results.len(), presets.len());
            for (preset, result) in presets.iter().zip(&results) {
                prop_assert_eq!(&preset.name, &result.name);
                prop_assert_eq!(preset.return_percent, result.return_percent);
            }
        }

        #[test]
        fn prop_higher_presets_end_higher(years in 1u32..51) {
            let params = InvestmentParameters {
                years: f64::from(years),
                ..sample_params()
            };
            let results = compare_scenarios(&params, &default_presets());

            prop_assert!(results[2].final_value > results[1].final_value);
            prop_assert!(results[1].final_value > results[0].final_value);
        }
    }
}
