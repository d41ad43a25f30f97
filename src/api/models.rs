use serde::{Deserialize, Serialize};

use crate::calculations::{CalcType, Estimate};
use crate::models::PriceQuote;

/// Shortest query the price endpoints accept.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Deserialize)]
pub struct PriceQuery {
    pub query: Option<String>,
}

#[derive(Serialize)]
pub struct PriceSearchResponse {
    pub query: String,
    pub results: Vec<PriceQuote>,
    pub count: usize,
    pub cached: bool,
}

#[derive(Deserialize)]
pub struct CalculationRequest {
    pub calc_type: CalcType,
    pub area: f64,
    #[serde(default = "default_variable")]
    pub variable: String,
}

fn default_variable() -> String {
    "standard".to_string()
}

#[derive(Serialize)]
pub struct CalculationResponse {
    pub calc_type: CalcType,
    pub input_area: f64,
    pub results: Estimate,
}

#[derive(Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}
