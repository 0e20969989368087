use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use serde::Serialize;
use std::sync::Arc;

use crate::constants::SERVER_NAME;
use crate::context::AqiContext;
use crate::error::AqiError;
use crate::formatters::{format_current, format_forecast, format_pollutant_form, format_stations};
use crate::models::{PredictCurrentRequest, PredictForecastRequest};

/// AQI prediction service that handles MCP requests
#[derive(Clone)]
pub struct AqiServer {
    context: Arc<AqiContext>,
    tool_router: ToolRouter<Self>,
}

impl AqiServer {
    pub fn new(context: Arc<AqiContext>) -> Self {
        Self {
            context,
            tool_router: Self::tool_router(),
        }
    }

    pub fn context(&self) -> &AqiContext {
        &self.context
    }

    /// Text for people, JSON for programs
    fn respond<T: Serialize>(text: String, payload: &T) -> Result<CallToolResult, McpError> {
        let json = Content::json(payload)?;
        Ok(CallToolResult::success(vec![Content::text(text), json]))
    }

    /// Expected misses become a tool-level error message, not a protocol failure
    fn reject(error: AqiError) -> CallToolResult {
        tracing::info!("Request rejected: {:?}", error);
        CallToolResult::error(vec![Content::text(error.to_string())])
    }
}

#[tool_handler]
impl ServerHandler for AqiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Air Quality Index predictions. Use predict_current with pollutant readings \
                (see pollutant_form for the required fields) to estimate the current AQI, or \
                predict_forecast with a station (see list_stations) and an hour to forecast \
                the next-hour AQI from historical readings. Categories follow the CPCB bands."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl AqiServer {
    /// Predicts the current AQI from pollutant readings
    #[tool(description = "Predict the current AQI from pollutant and weather readings. Provide every feature listed by pollutant_form as a string-encoded number, e.g. {\"readings\": {\"PM2.5\": \"80\", \"PM10\": \"140\"}}.")]
    pub async fn predict_current(
        &self,
        Parameters(request): Parameters<PredictCurrentRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Predicting current AQI from {} readings", request.readings.len());

        match self.context.predict_current(&request.readings) {
            Ok(result) => Self::respond(format_current(&result), &result),
            Err(error) => Ok(Self::reject(error)),
        }
    }

    /// Forecasts next-hour AQI for a station from its recorded history
    #[tool(description = "Forecast the AQI one hour after the given station hour, using the readings at that hour and 1 and 24 hours earlier. Reports the error against the recorded value when the next hour is on file.")]
    pub async fn predict_forecast(
        &self,
        Parameters(request): Parameters<PredictForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            "Forecasting next-hour AQI for {} at {:04}-{:02}-{:02} {:02}:00",
            request.station.trim(),
            request.year,
            request.month,
            request.day,
            request.hour
        );

        match self.context.predict_forecast(&request) {
            Ok(result) => Self::respond(format_forecast(&result), &result),
            Err(error) => Ok(Self::reject(error)),
        }
    }

    /// Lists the Part A input fields with their default values
    #[tool(description = "List the pollutant features predict_current requires, in model order, with suggested default values.")]
    pub async fn pollutant_form(&self) -> Result<CallToolResult, McpError> {
        tracing::info!("Listing pollutant form fields");

        let fields = self.context.pollutant_form();
        Self::respond(format_pollutant_form(&fields), &fields)
    }

    /// Lists stations with historical data
    #[tool(description = "List the monitoring stations available for predict_forecast, with their hourly coverage.")]
    pub async fn list_stations(&self) -> Result<CallToolResult, McpError> {
        tracing::info!("Listing stations");

        let stations = self.context.station_info();
        Self::respond(format_stations(&stations), &stations)
    }
}
