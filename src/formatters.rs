use crate::models::{CurrentPrediction, ForecastPrediction, PollutantField, StationInfo};

/// Formats a Part A prediction into a human-readable string
pub fn format_current(result: &CurrentPrediction) -> String {
    format!(
        "Current AQI Prediction (Part A)\n\n  Predicted AQI: {:.2}\n  Category: {}\n",
        result.prediction, result.category
    )
}

/// Formats a Part B forecast, with the comparison against the recorded value when known
pub fn format_forecast(result: &ForecastPrediction) -> String {
    let mut output = format!(
        "Next-hour AQI Forecast (Part B)\n\n  Station: {}\n  Base time: {}\n  Forecast time: {}\n  Predicted AQI: {:.2}\n  Category: {}\n",
        result.station, result.base_time, result.forecast_time, result.prediction, result.category
    );

    if let (Some(actual), Some(error)) = (result.actual, result.forecast_error) {
        output.push_str(&format!(
            "  Actual AQI: {:.2}\n  Forecast error: {:.2}\n",
            actual, error
        ));
    }
    output
}

/// Formats the Part A input form: one line per feature with its default value
pub fn format_pollutant_form(fields: &[PollutantField]) -> String {
    let mut output = String::from("Pollutant readings (Part A input, in model order):\n\n");
    for field in fields {
        output.push_str(&format!("  {}: {}\n", field.name, field.default));
    }
    output
}

/// Formats the station list offered for forecasting
pub fn format_stations(stations: &[StationInfo]) -> String {
    if stations.is_empty() {
        return "No stations loaded.".to_string();
    }

    let mut output = String::from("Monitoring Stations:\n\n");
    for (i, info) in stations.iter().enumerate() {
        output.push_str(&format!(
            "Station {}:\n  Name: {}\n  Hourly readings: {}\n",
            i + 1,
            info.station,
            info.rows
        ));
        if let (Some(first), Some(last)) = (&info.first_hour, &info.last_hour) {
            output.push_str(&format!("  Coverage: {} to {}\n", first, last));
        }
        output.push('\n');
    }
    output
}
