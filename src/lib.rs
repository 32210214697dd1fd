//! Live heatmap viewer for 8x8 thermal sensor APIs
//!
//! This library provides the building blocks for a single-threaded visualization
//! client that polls a sensor-api-server for thermal frames, upsamples them with
//! bicubic spline interpolation, and renders them as a color-mapped heatmap.
//!
//! # Architecture
//!
//! - **SensorClient**: Blocking HTTP fetch + JSON decode of 8x8 frames
//! - **Interpolator**: Fixed 8x8 -> 48x48 natural cubic spline upsampler
//! - **GainController**: Rolling min/max windows driving automatic gain control
//!   of the color scale
//! - **Heatmap / ViewerWindow**: Color-LUT rasterizer and minifb frontend
//!
//! # Example
//!
//! ```no_run
//! use thermview::{Interpolator, SensorClient};
//!
//! let client = SensorClient::new("sensor-host");
//! let interp = Interpolator::new();
//! let response = client.fetch()?;
//! if let Some(frame) = response.into_frame()? {
//!     let grid = interp.upsample(&frame.pixels);
//!     // ... rasterize and present
//! }
//! # Ok::<(), thermview::ViewerError>(())
//! ```

use thiserror::Error;

pub mod agc;
pub mod interp;
pub mod render;
pub mod sensor;
pub mod stats;

pub use agc::{GainController, MinMaxWindow};
pub use interp::{Interpolator, InterpGrid, SensorGrid, INTERP_DIM, SENSOR_DIM};
pub use render::{ColorMap, Heatmap, ViewerWindow};
pub use sensor::{Frame, SensorClient, SensorResponse};
pub use stats::TimingStats;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("Response decode failed: {0}")]
    Decode(#[from] std::io::Error),

    #[error("Malformed frame: expected {expected} temperatures, got {actual}")]
    BadFrame { expected: usize, actual: usize },

    #[error("Window error: {0}")]
    Window(#[from] minifb::Error),
}

impl From<ureq::Error> for ViewerError {
    fn from(e: ureq::Error) -> Self {
        ViewerError::Http(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
