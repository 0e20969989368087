#![allow(dead_code)]

use aqi_predict::context::AqiContext;
use aqi_predict::features::{PollutantSchema, FORECAST_SCHEMA};
use aqi_predict::prediction::PredictionService;
use aqi_predict::predictor::Predictor;
use aqi_predict::store::{station_hour, HistoricalStore, Reading};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

pub const ANAND_VIHAR: &str = "Anand Vihar";

pub const POLLUTANT_FEATURES: [&str; 11] = [
    "PM2.5", "PM10", "NO2", "SO2", "CO", "Ozone", "NH3", "AT", "RH", "WS", "BP",
];

/// Always returns the same value
pub struct ConstantPredictor {
    pub value: f64,
    pub width: usize,
}

impl Predictor for ConstantPredictor {
    fn n_features(&self) -> usize {
        self.width
    }

    fn predict(&self, _features: &[f64]) -> f64 {
        self.value
    }
}

/// Returns one input column unchanged
pub struct ColumnPredictor {
    pub column: usize,
    pub width: usize,
}

impl Predictor for ColumnPredictor {
    fn n_features(&self) -> usize {
        self.width
    }

    fn predict(&self, features: &[f64]) -> f64 {
        features[self.column]
    }
}

pub fn hour(year: i32, month: u32, day: u32, h: u32) -> NaiveDateTime {
    station_hour(year, month, day, h).unwrap()
}

/// A reading whose untouched fields carry distinct values, so column order is visible
pub fn reading(aqi_value: f64, pm25: f64) -> Reading {
    Reading {
        pm25,
        pm10: 2.0,
        no2: 3.0,
        so2: 4.0,
        co: 5.0,
        ozone: 6.0,
        nh3: 7.0,
        at: 8.0,
        rh: 9.0,
        ws: 10.0,
        bp: 11.0,
        wd: 12.0,
        aqi_value,
    }
}

/// Anand Vihar 2023-01-01 hours 0-2 (AQI 120, 130, 140) and 2022-12-31 hour 1 (AQI 100)
pub fn anand_vihar_store() -> HistoricalStore {
    HistoricalStore::from_readings([
        (ANAND_VIHAR, hour(2022, 12, 31, 1), reading(100.0, 50.0)),
        (ANAND_VIHAR, hour(2023, 1, 1, 0), reading(120.0, 60.0)),
        (ANAND_VIHAR, hour(2023, 1, 1, 1), reading(130.0, 61.0)),
        (ANAND_VIHAR, hour(2023, 1, 1, 2), reading(140.0, 62.0)),
    ])
}

pub fn pollutant_schema() -> PollutantSchema {
    PollutantSchema::new(POLLUTANT_FEATURES)
}

pub fn complete_form() -> BTreeMap<String, String> {
    POLLUTANT_FEATURES
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), format!("{}.5", i * 10)))
        .collect()
}

pub fn context_with(pollutant_value: f64, forecast_value: f64) -> AqiContext {
    let service = PredictionService::new(
        Box::new(ConstantPredictor {
            value: pollutant_value,
            width: POLLUTANT_FEATURES.len(),
        }),
        Box::new(ConstantPredictor {
            value: forecast_value,
            width: FORECAST_SCHEMA.len(),
        }),
    );
    AqiContext::new(anand_vihar_store(), service, pollutant_schema()).unwrap()
}
