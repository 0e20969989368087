/// Server name reported to MCP clients
pub const SERVER_NAME: &str = "aqi-predict";

/// Default location of the historical readings table
pub const DEFAULT_DATASET_PATH: &str = "data/Delhi_3Stations_With_AQI_CLEAN.csv";

/// Default location of the current-AQI (Part A) model artifact
pub const DEFAULT_POLLUTANT_MODEL_PATH: &str = "models/aqi_pollutant_model.json";

/// Default location of the ordered Part A feature-name list
pub const DEFAULT_POLLUTANT_FEATURES_PATH: &str = "models/aqi_pollutant_features.json";

/// Default location of the next-hour (Part B) model artifact
pub const DEFAULT_FORECAST_MODEL_PATH: &str = "models/aqi_next_hour_forecast_model.json";

/// Display format for base and forecast hours
pub const HOUR_FORMAT: &str = "%Y-%m-%d %H:00";

/// Pre-filled values for the Part A input form. Features not listed default to 0.
pub const POLLUTANT_FORM_DEFAULTS: &[(&str, f64)] = &[
    ("PM2.5", 80.0),
    ("PM10", 140.0),
    ("NO2", 30.0),
    ("SO2", 10.0),
    ("CO", 0.8),
    ("Ozone", 40.0),
    ("NH3", 25.0),
    ("AT", 28.0),
    ("RH", 60.0),
    ("WS", 2.5),
];
