//! Model input assembly for both prediction paths.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::constants::POLLUTANT_FORM_DEFAULTS;
use crate::error::{AqiError, ModelError};
use crate::store::{HistoricalStore, Reading};

/// Ordered model input. Position `i` feeds column `i` of the trained model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

// ============================================================================
// Part A: current AQI from pollutant readings
// ============================================================================

/// Ordered feature names the current-AQI model was trained on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollutantSchema {
    names: Vec<String>,
}

impl PollutantSchema {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads a JSON array of feature names
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path)?;
        let schema: Self = serde_json::from_str(&raw)?;
        if schema.names.is_empty() {
            return Err(ModelError::Invalid(
                "pollutant feature list is empty".to_string(),
            ));
        }
        Ok(schema)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Parses one form value per schema feature, in schema order.
///
/// A missing or non-numeric value fails the whole request; nothing is defaulted.
pub fn assemble_current(
    schema: &PollutantSchema,
    form: &BTreeMap<String, String>,
) -> Result<FeatureVector, AqiError> {
    let values = schema
        .names()
        .iter()
        .map(|name| {
            let raw = form.get(name).ok_or_else(|| AqiError::MissingField {
                field: name.clone(),
            })?;
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| AqiError::Parse {
                    field: name.clone(),
                    value: raw.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureVector::new(values))
}

/// Pre-filled form values for rendering the Part A input form
pub fn pollutant_defaults(schema: &PollutantSchema) -> Vec<(String, f64)> {
    schema
        .names()
        .iter()
        .map(|name| {
            let default = POLLUTANT_FORM_DEFAULTS
                .iter()
                .find(|(feature, _)| feature == name)
                .map_or(0.0, |(_, value)| *value);
            (name.clone(), default)
        })
        .collect()
}

// ============================================================================
// Part B: next-hour forecast from lagged history
// ============================================================================

/// One column of the next-hour forecast model input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastFeature {
    Pm25,
    Pm10,
    No2,
    So2,
    Co,
    Ozone,
    At,
    Bp,
    Rh,
    Ws,
    Wd,
    Year,
    Month,
    Day,
    Hour,
    AqiLag1,
    AqiLag24,
    Pm25Lag1,
    Pm25Lag24,
}

impl ForecastFeature {
    /// Column name the forecast model artifact declares for this feature
    pub const fn column(self) -> &'static str {
        match self {
            ForecastFeature::Pm25 => "PM2.5",
            ForecastFeature::Pm10 => "PM10",
            ForecastFeature::No2 => "NO2",
            ForecastFeature::So2 => "SO2",
            ForecastFeature::Co => "CO",
            ForecastFeature::Ozone => "Ozone",
            ForecastFeature::At => "AT",
            ForecastFeature::Bp => "BP",
            ForecastFeature::Rh => "RH",
            ForecastFeature::Ws => "WS",
            ForecastFeature::Wd => "WD",
            ForecastFeature::Year => "year",
            ForecastFeature::Month => "month",
            ForecastFeature::Day => "day",
            ForecastFeature::Hour => "hour",
            ForecastFeature::AqiLag1 => "AQI_lag_1",
            ForecastFeature::AqiLag24 => "AQI_lag_24",
            ForecastFeature::Pm25Lag1 => "PM2.5_lag_1",
            ForecastFeature::Pm25Lag24 => "PM2.5_lag_24",
        }
    }

    fn value(self, rows: &LagRows<'_>, at: NaiveDateTime) -> f64 {
        let base = rows.base;
        match self {
            ForecastFeature::Pm25 => base.pm25,
            ForecastFeature::Pm10 => base.pm10,
            ForecastFeature::No2 => base.no2,
            ForecastFeature::So2 => base.so2,
            ForecastFeature::Co => base.co,
            ForecastFeature::Ozone => base.ozone,
            ForecastFeature::At => base.at,
            ForecastFeature::Bp => base.bp,
            ForecastFeature::Rh => base.rh,
            ForecastFeature::Ws => base.ws,
            ForecastFeature::Wd => base.wd,
            ForecastFeature::Year => f64::from(at.year()),
            ForecastFeature::Month => f64::from(at.month()),
            ForecastFeature::Day => f64::from(at.day()),
            ForecastFeature::Hour => f64::from(at.hour()),
            ForecastFeature::AqiLag1 => rows.lag1.aqi_value,
            ForecastFeature::AqiLag24 => rows.lag24.aqi_value,
            ForecastFeature::Pm25Lag1 => rows.lag1.pm25,
            ForecastFeature::Pm25Lag24 => rows.lag24.pm25,
        }
    }
}

/// Column order of the next-hour forecast model. The model was trained on exactly
/// this order; reordering corrupts predictions without any error.
pub const FORECAST_SCHEMA: [ForecastFeature; 19] = [
    ForecastFeature::Pm25,
    ForecastFeature::Pm10,
    ForecastFeature::No2,
    ForecastFeature::So2,
    ForecastFeature::Co,
    ForecastFeature::Ozone,
    ForecastFeature::At,
    ForecastFeature::Bp,
    ForecastFeature::Rh,
    ForecastFeature::Ws,
    ForecastFeature::Wd,
    ForecastFeature::Year,
    ForecastFeature::Month,
    ForecastFeature::Day,
    ForecastFeature::Hour,
    ForecastFeature::AqiLag1,
    ForecastFeature::AqiLag24,
    ForecastFeature::Pm25Lag1,
    ForecastFeature::Pm25Lag24,
];

/// Column names of [`FORECAST_SCHEMA`], in order
pub fn forecast_columns() -> Vec<&'static str> {
    FORECAST_SCHEMA.iter().map(|feature| feature.column()).collect()
}

struct LagRows<'a> {
    base: &'a Reading,
    lag1: &'a Reading,
    lag24: &'a Reading,
}

/// Assembled Part B input plus the ground truth, when the next hour is on record
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastFeatures {
    pub station: String,
    pub base_time: NaiveDateTime,
    pub vector: FeatureVector,
    pub actual: Option<f64>,
}

impl ForecastFeatures {
    pub fn forecast_time(&self) -> NaiveDateTime {
        self.base_time + Duration::hours(1)
    }
}

/// Looks up the base, 1h-lag and 24h-lag rows and builds the forecast vector.
///
/// Each lookup is a separate precondition: a missing base row is `NoBaseData`,
/// a missing lag row is `NoLagData`.
pub fn assemble_forecast(
    store: &HistoricalStore,
    station: &str,
    at: NaiveDateTime,
) -> Result<ForecastFeatures, AqiError> {
    let station = station.trim();

    let base = store.lookup(station, at).ok_or(AqiError::NoBaseData)?;
    let lag1 = store
        .lookup(station, at - Duration::hours(1))
        .ok_or(AqiError::NoLagData { hours: 1 })?;
    let lag24 = store
        .lookup(station, at - Duration::hours(24))
        .ok_or(AqiError::NoLagData { hours: 24 })?;

    let rows = LagRows { base, lag1, lag24 };
    let vector = FeatureVector::new(
        FORECAST_SCHEMA
            .iter()
            .map(|feature| feature.value(&rows, at))
            .collect(),
    );

    let actual = store
        .lookup(station, at + Duration::hours(1))
        .map(|next| next.aqi_value);

    tracing::debug!(station, %at, features = ?vector.as_slice(), "Assembled forecast features");

    Ok(ForecastFeatures {
        station: station.to_string(),
        base_time: at,
        vector,
        actual,
    })
}
