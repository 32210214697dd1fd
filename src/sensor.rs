//! Sensor API client
//!
//! Provides `SensorClient` - a blocking HTTP client for the sensor-api-server
//! endpoint, and the JSON response / frame types it produces.
//!
//! One fetch per loop iteration; the request blocks the whole process for up to
//! the configured timeout. Transport failures propagate to the caller, while
//! sensor-reported errors are surfaced as an absent frame so the loop can skip
//! the iteration and count it.

use crate::interp::{SensorGrid, SENSOR_DIM};
use crate::{Result, ViewerError};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Request timeout for a single fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Raw JSON body returned by `GET /sensor/0/data`.
///
/// A missing `error` field reads as true (frame rejected); a missing
/// `ambient_temperature` reads as 0.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorResponse {
    /// Sensor-reported error flag; absent reads as true
    #[serde(default = "default_error")]
    pub error: bool,
    /// Row-major 8x8 pixel temperatures in degrees C
    #[serde(default)]
    pub temperatures: Vec<f64>,
    /// Thermistor (ambient) temperature in degrees C; absent reads as 0
    #[serde(default)]
    pub ambient_temperature: f64,
}

fn default_error() -> bool {
    true
}

/// One accepted thermal frame: an 8x8 temperature grid plus the ambient reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Pixel temperatures, `pixels[row][col]`, degrees C
    pub pixels: SensorGrid,
    /// Thermistor temperature, degrees C
    pub ambient: f64,
}

impl Frame {
    /// Minimum pixel temperature in the frame.
    pub fn min_temp(&self) -> f64 {
        self.pixels
            .iter()
            .flatten()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// Maximum pixel temperature in the frame.
    pub fn max_temp(&self) -> f64 {
        self.pixels
            .iter()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

impl SensorResponse {
    /// Convert a decoded response into a frame.
    ///
    /// Returns `Ok(None)` when the sensor reported an error (the iteration
    /// should be skipped and counted), `Err` when the payload does not carry
    /// exactly 64 temperatures.
    pub fn into_frame(self) -> Result<Option<Frame>> {
        if self.error {
            return Ok(None);
        }
        let expected = SENSOR_DIM * SENSOR_DIM;
        if self.temperatures.len() != expected {
            return Err(ViewerError::BadFrame {
                expected,
                actual: self.temperatures.len(),
            });
        }
        let mut pixels = [[0.0; SENSOR_DIM]; SENSOR_DIM];
        for (i, t) in self.temperatures.iter().enumerate() {
            pixels[i / SENSOR_DIM][i % SENSOR_DIM] = *t;
        }
        Ok(Some(Frame {
            pixels,
            ambient: self.ambient_temperature,
        }))
    }
}

/// Blocking client for one sensor endpoint.
pub struct SensorClient {
    agent: ureq::Agent,
    url: String,
}

impl SensorClient {
    /// Create a client for `http://{server}:8000/sensor/0/data`.
    pub fn new(server: &str) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
        Self {
            agent,
            url: format!("http://{server}:8000/sensor/0/data"),
        }
    }

    /// Endpoint URL this client polls.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one blocking GET and return the raw response body.
    ///
    /// Decoding is left to [`SensorClient::parse`] so callers can time the
    /// request and parse phases separately.
    pub fn fetch_body(&self) -> Result<String> {
        let response = self.agent.get(&self.url).call()?;
        let body = response.into_string()?;
        debug!(bytes = body.len(), "fetched sensor payload");
        Ok(body)
    }

    /// Decode a JSON body into a `SensorResponse`.
    pub fn parse(&self, body: &str) -> Result<SensorResponse> {
        let response: SensorResponse =
            serde_json::from_str(body).map_err(std::io::Error::from)?;
        Ok(response)
    }

    /// Fetch and decode in one step.
    pub fn fetch(&self) -> Result<SensorResponse> {
        let body = self.fetch_body()?;
        self.parse(&body)
    }
}
