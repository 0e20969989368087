mod common;

use aqi_predict::formatters::{format_forecast, format_stations};
use aqi_predict::models::{
    ForecastPrediction, PredictCurrentRequest, PredictForecastRequest,
};
use aqi_predict::prediction::Category;
use aqi_predict::service::AqiServer;
use common::{complete_form, context_with, ANAND_VIHAR};
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::Value;
use std::sync::Arc;

fn server() -> AqiServer {
    AqiServer::new(Arc::new(context_with(42.0, 137.456)))
}

fn as_json(result: &CallToolResult) -> Value {
    serde_json::to_value(result).unwrap()
}

fn is_error(result: &CallToolResult) -> bool {
    as_json(result)["isError"].as_bool().unwrap_or(false)
}

fn text_at(result: &CallToolResult, index: usize) -> String {
    as_json(result)["content"][index]["text"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_predict_current_tool() {
    let result = server()
        .predict_current(Parameters(PredictCurrentRequest {
            readings: complete_form(),
        }))
        .await
        .unwrap();

    assert!(!is_error(&result));
    assert!(text_at(&result, 0).contains("Predicted AQI: 42.00"));

    let payload: Value = serde_json::from_str(&text_at(&result, 1)).unwrap();
    assert_eq!(payload["prediction"], 42.0);
    assert_eq!(payload["category"], "Good");
}

#[tokio::test]
async fn test_predict_current_tool_parse_error() {
    let mut readings = complete_form();
    readings.insert("SO2".to_string(), "abc".to_string());

    let result = server()
        .predict_current(Parameters(PredictCurrentRequest { readings }))
        .await
        .unwrap();

    assert!(is_error(&result));
    assert!(text_at(&result, 0).contains("'SO2'"));
}

#[tokio::test]
async fn test_predict_forecast_tool() {
    let result = server()
        .predict_forecast(Parameters(PredictForecastRequest {
            station: ANAND_VIHAR.to_string(),
            year: 2023,
            month: 1,
            day: 1,
            hour: 1,
        }))
        .await
        .unwrap();

    assert!(!is_error(&result));
    let text = text_at(&result, 0);
    assert!(text.contains("Forecast time: 2023-01-01 02:00"));
    assert!(text.contains("Actual AQI: 140.00"));
    assert!(text.contains("Forecast error: 2.54"));

    let payload: Value = serde_json::from_str(&text_at(&result, 1)).unwrap();
    assert_eq!(payload["category"], "Moderate");
    assert_eq!(payload["base_time"], "2023-01-01 01:00");
}

#[tokio::test]
async fn test_predict_forecast_tool_missing_data() {
    let result = server()
        .predict_forecast(Parameters(PredictForecastRequest {
            station: "Okhla".to_string(),
            year: 2023,
            month: 1,
            day: 1,
            hour: 1,
        }))
        .await
        .unwrap();

    assert!(is_error(&result));
    assert_eq!(text_at(&result, 0), "No data for selected station & time.");
}

#[tokio::test]
async fn test_predict_forecast_tool_negative_hour() {
    let result = server()
        .predict_forecast(Parameters(PredictForecastRequest {
            station: ANAND_VIHAR.to_string(),
            year: 2023,
            month: 1,
            day: 1,
            hour: -1,
        }))
        .await
        .unwrap();

    assert!(is_error(&result));
    assert!(text_at(&result, 0).starts_with("Invalid input:"));
}

#[tokio::test]
async fn test_listing_tools() {
    let server = server();

    let stations = server.list_stations().await.unwrap();
    assert!(text_at(&stations, 0).contains("Name: Anand Vihar"));

    let form = server.pollutant_form().await.unwrap();
    assert!(text_at(&form, 0).contains("PM2.5: 80"));
}

#[test]
fn test_format_forecast_without_ground_truth() {
    let text = format_forecast(&ForecastPrediction {
        prediction: 88.0,
        category: Category::Satisfactory,
        station: ANAND_VIHAR.to_string(),
        base_time: "2023-01-01 02:00".to_string(),
        forecast_time: "2023-01-01 03:00".to_string(),
        actual: None,
        forecast_error: None,
    });

    assert!(text.contains("Category: Satisfactory"));
    assert!(!text.contains("Actual AQI"));
}

#[test]
fn test_format_stations_empty() {
    assert_eq!(format_stations(&[]), "No stations loaded.");
}
