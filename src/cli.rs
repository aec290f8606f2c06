use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "lenstrace")]
#[command(about = "Sequential geometric ray tracer for spherical lens design")]
pub struct Args {
    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Front-surface curvature of the singlet in 1/mm
    #[arg(short, long, default_value_t = 0.02)]
    pub curvature: f64,

    /// Refractive index of the lens glass
    #[arg(short = 'n', long, default_value_t = 1.5168)]
    pub lens_index: f64,

    /// Axial separation of the two lens surfaces in mm
    #[arg(long, default_value_t = 10.0)]
    pub thickness: f64,

    /// Aperture radius of both lens surfaces in mm
    #[arg(long, default_value_t = 5.0)]
    pub aperture: f64,

    /// Focal length measured from the lens centre in mm
    #[arg(short, long, default_value_t = 35.487)]
    pub focal_length: f64,

    /// Number of rings in the traced cylindrical beam
    #[arg(long, default_value_t = 20)]
    pub rings: usize,

    /// Radial spacing between beam rings in mm
    #[arg(long, default_value_t = 0.2)]
    pub ring_step: f64,

    /// Launch plane of the beam on the optical axis in mm
    #[arg(long, default_value_t = -20.0, allow_hyphen_values = true)]
    pub launch_z: f64,

    /// Sweep front curvatures for the minimum-RMS singlet instead of tracing
    #[arg(long)]
    pub optimize: bool,

    /// Output file path for the spot diagram PNG
    #[arg(short, long, default_value = "spot.png")]
    pub output: String,

    /// Spot diagram image size in pixels
    #[arg(long, default_value_t = 512)]
    pub spot_size: u32,
}
