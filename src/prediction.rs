//! Prediction service and CPCB category bands.

use serde::Serialize;
use std::fmt;

use crate::error::AqiError;
use crate::features::FeatureVector;
use crate::predictor::Predictor;

/// Which of the two loaded models to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelId {
    /// Current AQI from pollutant readings
    Pollutant,
    /// Next-hour AQI from lagged history
    Forecast,
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelId::Pollutant => write!(f, "pollutant"),
            ModelId::Forecast => write!(f, "forecast"),
        }
    }
}

/// CPCB AQI category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Good,
    Satisfactory,
    Moderate,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Severe,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Satisfactory => "Satisfactory",
            Category::Moderate => "Moderate",
            Category::Poor => "Poor",
            Category::VeryPoor => "Very Poor",
            Category::Severe => "Severe",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an AQI value to its CPCB band. Each upper bound is inclusive.
pub fn classify(aqi: f64) -> Category {
    if aqi <= 50.0 {
        Category::Good
    } else if aqi <= 100.0 {
        Category::Satisfactory
    } else if aqi <= 200.0 {
        Category::Moderate
    } else if aqi <= 300.0 {
        Category::Poor
    } else if aqi <= 400.0 {
        Category::VeryPoor
    } else {
        Category::Severe
    }
}

/// Rounds to two decimals from the exact decimal value of `value`, so exact
/// ties go to the even digit and `100.005` (stored just below) stays `100.0`
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// A rounded prediction and the band it falls in
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub value: f64,
    pub category: Category,
}

impl PredictionResult {
    /// Rounds first, then classifies the rounded value
    pub fn from_raw(raw: f64) -> Self {
        let value = round2(raw);
        Self {
            value,
            category: classify(value),
        }
    }
}

/// Holds the two trained models behind one `predict` entry point
pub struct PredictionService {
    pollutant: Box<dyn Predictor>,
    forecast: Box<dyn Predictor>,
}

impl PredictionService {
    pub fn new(pollutant: Box<dyn Predictor>, forecast: Box<dyn Predictor>) -> Self {
        Self {
            pollutant,
            forecast,
        }
    }

    pub fn model(&self, model: ModelId) -> &dyn Predictor {
        match model {
            ModelId::Pollutant => self.pollutant.as_ref(),
            ModelId::Forecast => self.forecast.as_ref(),
        }
    }

    /// Runs one model. The vector length must match what the model was trained on.
    pub fn predict(&self, model: ModelId, features: &FeatureVector) -> Result<f64, AqiError> {
        let predictor = self.model(model);
        let expected = predictor.n_features();
        if features.len() != expected {
            return Err(AqiError::SchemaMismatch {
                model,
                expected,
                actual: features.len(),
            });
        }
        Ok(predictor.predict(features.as_slice()))
    }
}

impl fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionService")
            .field("pollutant_features", &self.pollutant.n_features())
            .field("forecast_features", &self.forecast.n_features())
            .finish()
    }
}
