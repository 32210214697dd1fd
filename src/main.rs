//! Live Thermal Viewer
//!
//! Polls a sensor-api-server for 8x8 thermal frames, upsamples them with cubic
//! spline interpolation, and renders a live color-mapped heatmap.
//!
//! Usage:
//!   cargo run --release -- sensor-host --agc --frames 100 --timing

use clap::Parser;
use std::time::Instant;
use thermview::stats::Phase;
use thermview::{
    GainController, Heatmap, Interpolator, SensorClient, TimingStats, ViewerWindow,
};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Client for the sensor-api-server")]
struct Args {
    /// Full domain name or address of the server hosting the API
    server: String,

    /// Apply Automatic Gain Control to the image, adjusting the temperature
    /// range to recent extremes. Default is not to.
    #[arg(long)]
    agc: bool,

    /// Number of frames to display. Default is to run until stopped explicitly.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    frames: Option<u64>,

    /// Display the average frame times at shutdown. Default is not to.
    #[arg(long)]
    timing: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    println!("Server: {}", args.server);

    let client = SensorClient::new(&args.server);
    info!("Polling {}", client.url());

    let interpolator = Interpolator::new();
    let mut heatmap = Heatmap::new();
    let mut window = ViewerWindow::new("Thermal Image Interpolation", &heatmap)?;
    let mut agc = GainController::new(Instant::now());
    let mut stats = TimingStats::new();

    let max_frames = args.frames.unwrap_or(u64::MAX);
    let mut frame_count: u64 = 0;

    // Error frames consume an iteration too; --frames bounds loop turns, not
    // accepted frames.
    while frame_count < max_frames && window.is_open() {
        frame_count += 1;

        let read_start = Instant::now();
        let body = client.fetch_body()?;
        let request_end = Instant::now();
        stats.record(Phase::Request, request_end - read_start);

        let response = client.parse(&body)?;
        stats.record(Phase::Parse, request_end.elapsed());

        let Some(frame) = response.into_frame()? else {
            debug!(frame_count, "sensor reported an error, skipping frame");
            stats.count_error();
            continue;
        };
        let read_end = Instant::now();
        stats.record(Phase::Read, read_end - read_start);

        let grid = interpolator.upsample(&frame.pixels);
        let interp_end = Instant::now();
        stats.record(Phase::Interp, interp_end - read_end);

        heatmap.set_data(&grid);
        window.present(&heatmap)?;
        stats.record(Phase::Draw, interp_end.elapsed());

        let (lower, upper) = heatmap.clim();
        window.set_status(&format!(
            "Thermal Image Interpolation | ambient {:.1}C | scale {:.1}C..{:.1}C | frame {}",
            frame.ambient, lower, upper, frame_count
        ));

        if args.agc {
            agc.observe(frame.min_temp(), frame.max_temp());
            if let Some((lower, upper)) = agc.maybe_adjust(Instant::now()) {
                heatmap.set_clim(lower, upper);
            }
        }
    }

    if args.timing {
        stats.report();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_rejects_zero() {
        assert!(Args::try_parse_from(["thermview", "host", "--frames", "0"]).is_err());
    }

    #[test]
    fn test_frames_accepts_one() {
        let args = Args::try_parse_from(["thermview", "host", "--frames", "1"]).unwrap();
        assert_eq!(args.frames, Some(1));
    }

    #[test]
    fn test_server_is_required() {
        assert!(Args::try_parse_from(["thermview"]).is_err());
    }

    #[test]
    fn test_flag_defaults() {
        let args = Args::try_parse_from(["thermview", "host"]).unwrap();
        assert!(!args.agc);
        assert!(!args.timing);
        assert_eq!(args.frames, None);
    }
}
