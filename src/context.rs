//! Immutable state loaded once at startup and shared by every request.

use anyhow::{Context, Result};
use std::collections::BTreeMap;

use crate::config::AppConfig;
use crate::constants::HOUR_FORMAT;
use crate::error::{AqiError, ModelError};
use crate::features::{
    assemble_current, assemble_forecast, forecast_columns, pollutant_defaults, PollutantSchema,
    FORECAST_SCHEMA,
};
use crate::models::{
    CurrentPrediction, ForecastPrediction, PollutantField, PredictForecastRequest, StationInfo,
};
use crate::prediction::{round2, ModelId, PredictionResult, PredictionService};
use crate::predictor::{ModelArtifact, Predictor};
use crate::store::HistoricalStore;

#[derive(Debug)]
pub struct AqiContext {
    store: HistoricalStore,
    service: PredictionService,
    pollutant_schema: PollutantSchema,
}

impl AqiContext {
    /// Assembles a context from already-loaded parts.
    ///
    /// Fails when a model's declared features disagree with the input it will be fed.
    pub fn new(
        store: HistoricalStore,
        service: PredictionService,
        pollutant_schema: PollutantSchema,
    ) -> Result<Self, ModelError> {
        check_features(
            service.model(ModelId::Pollutant),
            pollutant_schema.names().iter().map(String::as_str).collect(),
        )?;
        check_features(service.model(ModelId::Forecast), forecast_columns())?;

        Ok(Self {
            store,
            service,
            pollutant_schema,
        })
    }

    /// Loads the table, the feature list and both model artifacts
    pub fn load(config: &AppConfig) -> Result<Self> {
        let store = HistoricalStore::from_csv(&config.dataset_path).with_context(|| {
            format!("Failed to load dataset {}", config.dataset_path.display())
        })?;

        let pollutant_schema = PollutantSchema::from_json_file(&config.pollutant_features_path)
            .with_context(|| {
                format!(
                    "Failed to load pollutant features {}",
                    config.pollutant_features_path.display()
                )
            })?;

        let pollutant = ModelArtifact::from_json_file(&config.pollutant_model_path)
            .with_context(|| {
                format!(
                    "Failed to load pollutant model {}",
                    config.pollutant_model_path.display()
                )
            })?;

        let forecast = ModelArtifact::from_json_file(&config.forecast_model_path)
            .with_context(|| {
                format!(
                    "Failed to load forecast model {}",
                    config.forecast_model_path.display()
                )
            })?;

        let service = PredictionService::new(Box::new(pollutant), Box::new(forecast));
        let context = Self::new(store, service, pollutant_schema)
            .context("Model artifacts do not match their feature schemas")?;

        tracing::info!(
            rows = context.store.len(),
            pollutant_features = context.pollutant_schema.len(),
            forecast_features = FORECAST_SCHEMA.len(),
            "Prediction context ready"
        );
        Ok(context)
    }

    pub fn store(&self) -> &HistoricalStore {
        &self.store
    }

    pub fn pollutant_schema(&self) -> &PollutantSchema {
        &self.pollutant_schema
    }

    /// Part A: current AQI from a complete set of pollutant readings
    pub fn predict_current(
        &self,
        readings: &BTreeMap<String, String>,
    ) -> Result<CurrentPrediction, AqiError> {
        let features = assemble_current(&self.pollutant_schema, readings)?;
        let result = PredictionResult::from_raw(self.service.predict(ModelId::Pollutant, &features)?);

        Ok(CurrentPrediction {
            prediction: result.value,
            category: result.category,
        })
    }

    /// Part B: next-hour AQI for a station, compared with the recorded value when known
    pub fn predict_forecast(
        &self,
        request: &PredictForecastRequest,
    ) -> Result<ForecastPrediction, AqiError> {
        let at = request.resolve()?;
        let features = assemble_forecast(&self.store, &request.station, at)?;
        let result =
            PredictionResult::from_raw(self.service.predict(ModelId::Forecast, &features.vector)?);

        let forecast_error = features
            .actual
            .map(|actual| round2((actual - result.value).abs()));

        Ok(ForecastPrediction {
            prediction: result.value,
            category: result.category,
            station: features.station.clone(),
            base_time: features.base_time.format(HOUR_FORMAT).to_string(),
            forecast_time: features.forecast_time().format(HOUR_FORMAT).to_string(),
            actual: features.actual,
            forecast_error,
        })
    }

    /// Ordered Part A fields with their form defaults
    pub fn pollutant_form(&self) -> Vec<PollutantField> {
        pollutant_defaults(&self.pollutant_schema)
            .into_iter()
            .map(|(name, default)| PollutantField { name, default })
            .collect()
    }

    pub fn station_info(&self) -> Vec<StationInfo> {
        self.store
            .stations()
            .into_iter()
            .map(|station| {
                let span = self.store.span(station);
                StationInfo {
                    station: station.to_string(),
                    rows: self.store.station_rows(station),
                    first_hour: span.map(|(first, _)| first.format(HOUR_FORMAT).to_string()),
                    last_hour: span.map(|(_, last)| last.format(HOUR_FORMAT).to_string()),
                }
            })
            .collect()
    }
}

fn check_features(predictor: &dyn Predictor, expected: Vec<&str>) -> Result<(), ModelError> {
    let mismatch = match predictor.feature_names() {
        Some(found) => found.iter().map(String::as_str).ne(expected.iter().copied()),
        None => predictor.n_features() != expected.len(),
    };

    if mismatch {
        return Err(ModelError::FeatureMismatch {
            expected: expected.into_iter().map(str::to_string).collect(),
            found: predictor.feature_names().map_or_else(
                || vec![format!("<{} unnamed features>", predictor.n_features())],
                <[String]>::to_vec,
            ),
        });
    }
    Ok(())
}
