use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    InvestmentParameters, ProjectionInsights, ProjectionResult, ScenarioPreset, ScenarioResult,
    compare_scenarios, default_presets, insights, parse_number_or_zero, project,
};
use crate::error::{AppError, AppResult};
use crate::report;

/// Longest horizon the CLI and the HTTP API will simulate. Only these
/// surfaces check it; `core::project` accepts any horizon.
pub const MAX_API_YEARS: f64 = 1000.0;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "compounder",
    about = "Monthly-compounding investment projection with inflation and return scenarios"
)]
pub struct Cli {
    #[arg(long, default_value = "10000", allow_hyphen_values = true, help = "Starting capital")]
    initial_amount: String,
    #[arg(
        long,
        default_value = "500",
        allow_hyphen_values = true,
        help = "Contribution added at the start of every month"
    )]
    monthly_contribution: String,
    #[arg(
        long,
        default_value = "7",
        allow_hyphen_values = true,
        help = "Expected annual return in percent, e.g. 7"
    )]
    annual_return: String,
    #[arg(long, default_value = "20", allow_hyphen_values = true)]
    years: String,
    #[arg(
        long,
        default_value = "2.5",
        allow_hyphen_values = true,
        help = "Annual inflation in percent, only used for the real value"
    )]
    inflation_rate: String,
    #[arg(long, help = "Print the full result as JSON instead of tables")]
    json: bool,
}

/// A numeric field as a client may send it. Strings go through the same
/// parse-or-zero policy as the CLI; anything else counts as 0.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawNumber::deserialize(deserializer)? {
        RawNumber::Number(v) if v.is_finite() => v,
        RawNumber::Number(_) | RawNumber::Other(_) => 0.0,
        RawNumber::Text(s) => parse_number_or_zero(&s),
    };
    Ok(Some(value))
}

/// Absent keys keep the calculator defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    #[serde(deserialize_with = "lenient_number")]
    initial_amount: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    monthly_contribution: Option<f64>,
    #[serde(deserialize_with = "lenient_number", alias = "annualReturnPercent")]
    annual_return: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    years: Option<f64>,
    #[serde(deserialize_with = "lenient_number", alias = "inflationRatePercent")]
    inflation_rate: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub parameters: InvestmentParameters,
    pub projection: ProjectionResult,
    pub insights: ProjectionInsights,
    pub scenarios: Vec<ScenarioResult>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        error_response(status, &self.to_string())
    }
}

fn build_parameters(cli: &Cli) -> InvestmentParameters {
    InvestmentParameters {
        initial_amount: parse_number_or_zero(&cli.initial_amount),
        monthly_contribution: parse_number_or_zero(&cli.monthly_contribution),
        annual_return_percent: parse_number_or_zero(&cli.annual_return),
        years: parse_number_or_zero(&cli.years),
        inflation_rate_percent: parse_number_or_zero(&cli.inflation_rate),
    }
}

fn parameters_from_payload(payload: ProjectPayload) -> InvestmentParameters {
    let defaults = InvestmentParameters::default();
    InvestmentParameters {
        initial_amount: payload.initial_amount.unwrap_or(defaults.initial_amount),
        monthly_contribution: payload
            .monthly_contribution
            .unwrap_or(defaults.monthly_contribution),
        annual_return_percent: payload
            .annual_return
            .unwrap_or(defaults.annual_return_percent),
        years: payload.years.unwrap_or(defaults.years),
        inflation_rate_percent: payload
            .inflation_rate
            .unwrap_or(defaults.inflation_rate_percent),
    }
}

fn check_horizon(params: &InvestmentParameters) -> AppResult<()> {
    if params.years > MAX_API_YEARS {
        return Err(AppError::HorizonTooLong {
            max: MAX_API_YEARS,
            got: params.years,
        });
    }
    Ok(())
}

pub fn build_response(
    params: InvestmentParameters,
    presets: &[ScenarioPreset],
) -> AppResult<ProjectResponse> {
    check_horizon(&params)?;
    let projection = project(&params);
    let insights = insights(&params, &projection);
    let scenarios = compare_scenarios(&params, presets);
    Ok(ProjectResponse {
        parameters: params,
        projection,
        insights,
        scenarios,
    })
}

/// Renders the CLI output for already-parsed arguments.
pub fn render_cli(cli: &Cli) -> AppResult<String> {
    let params = build_parameters(cli);
    let response = build_response(params, &default_presets())?;
    if cli.json {
        return Ok(serde_json::to_string_pretty(&response)?);
    }
    Ok(report::render(&response))
}

pub fn run_cli<I, T>(args: I) -> AppResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    println!("{}", render_cli(&cli)?);
    Ok(())
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/scenarios", get(scenarios_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> AppResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "projection API listening");
    info!("local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, router()).await?;
    Ok(())
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn scenarios_handler() -> Response {
    json_response(StatusCode::OK, default_presets())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let params = parameters_from_payload(payload);
    debug!(?params, "projection requested");
    match build_response(params, &default_presets()) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => {
            warn!(%err, "projection rejected");
            err.into_response()
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn parameters_from_json(json: &str) -> Result<InvestmentParameters, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(parameters_from_payload(payload))
}
