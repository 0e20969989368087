//! # aqi-predict
//!
//! Air Quality Index predictions served over the Model Context Protocol.
//!
//! - **Part A** predicts the current AQI from a full set of pollutant readings.
//! - **Part B** forecasts the next-hour AQI for a station from the readings at the
//!   base hour and 1 and 24 hours earlier, looked up in a historical table.
//!
//! Both models are opaque [`predictor::Predictor`]s; the Part B input order is fixed
//! by [`features::FORECAST_SCHEMA`].

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod features;
pub mod formatters;
pub mod models;
pub mod prediction;
pub mod predictor;
pub mod service;
pub mod store;
