use clap::{Parser, ValueEnum};
use halo_math::LaneWidth;
use log::LevelFilter;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

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

/// Vector lane count for the sphere accelerator
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Lanes {
    #[value(name = "1")]
    One,
    #[value(name = "4")]
    Four,
    #[value(name = "8")]
    Eight,
    /// Widest width the build target supports
    Native,
}

impl From<Lanes> for LaneWidth {
    fn from(lanes: Lanes) -> Self {
        match lanes {
            Lanes::One => LaneWidth::Scalar,
            Lanes::Four => LaneWidth::X4,
            Lanes::Eight => LaneWidth::X8,
            Lanes::Native => LaneWidth::native(),
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "halo")]
#[command(about = "Render a random sphere field with a SIMD path tracer")]
pub struct Args {
    /// Image width in pixels
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "720")]
    pub height: u32,

    /// Number of samples per pixel
    #[arg(long, short = 's', default_value = "16")]
    pub samples: u32,

    /// Maximum bounces per path
    #[arg(long, default_value = "50")]
    pub max_depth: u32,

    /// Tile edge in pixels
    #[arg(long, default_value = "8")]
    pub tile_size: u32,

    /// Accelerator lane width
    #[arg(long, value_enum, default_value = "native")]
    pub lanes: Lanes,

    /// Seed for the random scene layout
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Half-size of the small sphere grid (11 gives a 22x22 grid)
    #[arg(long, default_value = "11")]
    pub grid: i32,

    /// Render on the calling thread only
    #[arg(long)]
    pub serial: bool,

    /// Write ASCII (P3) instead of binary (P6) PPM
    #[arg(long)]
    pub ascii: bool,

    /// Output file path
    #[arg(short, long, default_value = "output.ppm")]
    pub output: String,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
