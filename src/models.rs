use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AqiError;
use crate::prediction::Category;
use crate::store::station_hour;

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PredictCurrentRequest {
    /// Pollutant feature name mapped to its value as text, e.g. {"PM2.5": "80"}
    pub readings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PredictForecastRequest {
    pub station: String,
    pub year: i64,
    pub month: i64,
    pub day: i64,
    /// Hour of day, 0-23
    pub hour: i64,
}

impl PredictForecastRequest {
    /// The base hour named by the request. Out-of-range values, negative ones
    /// included, are `InvalidInput`.
    pub fn resolve(&self) -> Result<NaiveDateTime, AqiError> {
        self.station_hour().ok_or_else(|| {
            AqiError::InvalidInput(format!(
                "{:04}-{:02}-{:02} hour {} is not a valid date and hour",
                self.year, self.month, self.day, self.hour
            ))
        })
    }

    fn station_hour(&self) -> Option<NaiveDateTime> {
        station_hour(
            i32::try_from(self.year).ok()?,
            u32::try_from(self.month).ok()?,
            u32::try_from(self.day).ok()?,
            u32::try_from(self.hour).ok()?,
        )
    }
}

// ============================================================================
// MCP Tool Response Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentPrediction {
    pub prediction: f64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPrediction {
    pub prediction: f64,
    pub category: Category,
    pub station: String,
    pub base_time: String,
    pub forecast_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_error: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantField {
    pub name: String,
    pub default: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationInfo {
    pub station: String,
    pub rows: usize,
    pub first_hour: Option<String>,
    pub last_hour: Option<String>,
}
