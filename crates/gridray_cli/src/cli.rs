use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels accepted on the command line
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

/// Built-in scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Ground grid seen straight down the -z axis
    Grid,
    /// Perspective view of two spheres standing on the grid
    Spheres,
}

#[derive(Parser, Debug)]
#[command(name = "gridray")]
#[command(about = "Trace a ground grid scene, or write a test pattern, to PNG")]
pub struct Args {
    /// Image width in pixels
    #[arg(long, default_value = "256")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "256")]
    pub height: u32,

    /// Samples along each pixel axis (overrides the config file)
    #[arg(long, short = 's', value_parser = clap::value_parser!(u32).range(1..=4))]
    pub samples: Option<u32>,

    /// Jitter sample positions inside each pixel
    #[arg(long)]
    pub jitter: bool,

    /// Seed for jitter (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Render buckets in parallel instead of scanlines on one thread
    #[arg(long)]
    pub parallel: bool,

    /// Write test pattern N instead of tracing (wraps around the pattern count)
    #[arg(long, allow_hyphen_values = true)]
    pub pattern: Option<i32>,

    /// Scene to trace
    #[arg(long, value_enum, default_value = "grid")]
    pub scene: SceneKind,

    /// JSON render config
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, default_value = "gridray.png")]
    pub output: PathBuf,

    /// Logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["gridray"]).unwrap();

        assert_eq!((args.width, args.height), (256, 256));
        assert_eq!(args.scene, SceneKind::Grid);
        assert_eq!(args.samples, None);
        assert!(!args.parallel);
        assert_eq!(args.output, PathBuf::from("gridray.png"));
    }

    #[test]
    fn test_negative_pattern_index() {
        let args = Args::try_parse_from(["gridray", "--pattern", "-1"]).unwrap();

        assert_eq!(args.pattern, Some(-1));
    }

    #[test]
    fn test_samples_range() {
        assert!(Args::try_parse_from(["gridray", "--samples", "4"]).is_ok());
        assert!(Args::try_parse_from(["gridray", "--samples", "0"]).is_err());
        assert!(Args::try_parse_from(["gridray", "--samples", "5"]).is_err());
    }

    #[test]
    fn test_log_level_maps_to_filter() {
        let args = Args::try_parse_from(["gridray", "--log-level", "debug", "--scene", "spheres"])
            .unwrap();

        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
        assert_eq!(args.scene, SceneKind::Spheres);
    }
}
