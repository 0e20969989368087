//! In-memory historical readings, indexed by station and hour.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::StoreError;

/// Pollutant and meteorological values recorded for one station hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub pm25: f64,
    pub pm10: f64,
    pub no2: f64,
    pub so2: f64,
    pub co: f64,
    pub ozone: f64,
    pub nh3: f64,
    /// Ambient temperature
    pub at: f64,
    /// Relative humidity
    pub rh: f64,
    /// Wind speed
    pub ws: f64,
    /// Barometric pressure
    pub bp: f64,
    /// Wind direction
    pub wd: f64,
    pub aqi_value: f64,
}

// ============================================================================
// CSV Row Model
// ============================================================================

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Station")]
    station: String,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    #[serde(rename = "PM2.5")]
    pm25: f64,
    #[serde(rename = "PM10")]
    pm10: f64,
    #[serde(rename = "NO2")]
    no2: f64,
    #[serde(rename = "SO2")]
    so2: f64,
    #[serde(rename = "CO")]
    co: f64,
    #[serde(rename = "Ozone")]
    ozone: f64,
    #[serde(rename = "NH3")]
    nh3: f64,
    #[serde(rename = "AT")]
    at: f64,
    #[serde(rename = "RH")]
    rh: f64,
    #[serde(rename = "WS")]
    ws: f64,
    #[serde(rename = "BP")]
    bp: f64,
    #[serde(rename = "WD")]
    wd: f64,
    #[serde(rename = "AQI_Value")]
    aqi_value: f64,
}

impl CsvRow {
    fn reading(&self) -> Reading {
        Reading {
            pm25: self.pm25,
            pm10: self.pm10,
            no2: self.no2,
            so2: self.so2,
            co: self.co,
            ozone: self.ozone,
            nh3: self.nh3,
            at: self.at,
            rh: self.rh,
            ws: self.ws,
            bp: self.bp,
            wd: self.wd,
            aqi_value: self.aqi_value,
        }
    }
}

const REQUIRED_COLUMNS: [&str; 18] = [
    "Station", "year", "month", "day", "hour", "PM2.5", "PM10", "NO2", "SO2", "CO", "Ozone",
    "NH3", "AT", "RH", "WS", "BP", "WD", "AQI_Value",
];

/// Builds the on-the-hour timestamp used as an index key
pub fn station_hour(year: i32, month: u32, day: u32, hour: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, 0, 0)
}

/// Read-only table of readings keyed by (station, hour).
///
/// Station names are trimmed on insert and on lookup; matching is case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct HistoricalStore {
    stations: HashMap<String, HashMap<NaiveDateTime, Reading>>,
    rows: usize,
}

impl HistoricalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store from a CSV file on disk
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Loads a store from any CSV source with a header row.
    ///
    /// Headers are trimmed and extra columns ignored. A missing column fails the
    /// load; a row with an unreadable value is skipped. When a key repeats, the
    /// first row is kept.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?;
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|column| !headers.iter().any(|header| header == **column))
        {
            return Err(StoreError::MissingColumn(missing.to_string()));
        }

        let mut store = Self::new();
        let mut skipped = 0usize;

        for (index, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
            // header is line 1
            let line = index + 2;
            let row = match record {
                Ok(row) => row,
                Err(error) if matches!(error.kind(), csv::ErrorKind::Deserialize { .. }) => {
                    tracing::warn!(line, %error, "Skipping row with unreadable values");
                    skipped += 1;
                    continue;
                }
                Err(error) => return Err(error.into()),
            };

            let Some(at) = station_hour(row.year, row.month, row.day, row.hour) else {
                tracing::warn!(
                    line,
                    station = row.station.trim(),
                    "Skipping row with invalid timestamp {}-{}-{} {}h",
                    row.year,
                    row.month,
                    row.day,
                    row.hour
                );
                skipped += 1;
                continue;
            };

            if !store.insert(&row.station, at, row.reading()) {
                tracing::warn!(
                    line,
                    station = row.station.trim(),
                    %at,
                    "Duplicate station hour, keeping the first row"
                );
                skipped += 1;
            }
        }

        tracing::info!(
            rows = store.len(),
            stations = store.stations.len(),
            skipped,
            "Loaded historical readings"
        );
        Ok(store)
    }

    /// Builds a store from in-memory rows
    pub fn from_readings<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, NaiveDateTime, Reading)>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        for (station, at, reading) in rows {
            store.insert(station.as_ref(), at, reading);
        }
        store
    }

    /// Adds a row. Returns `false` and leaves the store untouched when the key exists.
    pub fn insert(&mut self, station: &str, at: NaiveDateTime, reading: Reading) -> bool {
        let hours = self.stations.entry(station.trim().to_string()).or_default();
        if hours.contains_key(&at) {
            return false;
        }
        hours.insert(at, reading);
        self.rows += 1;
        true
    }

    /// Exact lookup of one station hour. A miss is `None`, never an error.
    pub fn lookup(&self, station: &str, at: NaiveDateTime) -> Option<&Reading> {
        self.stations.get(station.trim())?.get(&at)
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Indexed station names, sorted
    pub fn stations(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of rows indexed for a station
    pub fn station_rows(&self, station: &str) -> usize {
        self.stations.get(station.trim()).map_or(0, HashMap::len)
    }

    /// First and last indexed hour of a station
    pub fn span(&self, station: &str) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let hours = self.stations.get(station.trim())?;
        let first = hours.keys().min()?;
        let last = hours.keys().max()?;
        Some((*first, *last))
    }
}
