//! Command-line and environment configuration.

use clap::Parser;
use std::path::PathBuf;

/// Launch records dashboard
///
/// Pick a launch site and a payload range to see the outcome breakdown and
/// the payload / outcome correlation.
///
/// Examples:
///   launch-dash
///   launch-dash --data data/sample_launches.parquet
///   RUST_LOG=debug launch-dash --slider-max 16000 --slider-step 500
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Launch records file (.csv, .json or .parquet)
    #[arg(
        short,
        long,
        default_value = "data/spacex_launch_dash.csv",
        env = "LAUNCH_DASH_DATA",
        value_name = "FILE"
    )]
    pub data: PathBuf,

    /// Lower end of the payload slider (kg)
    #[arg(long, default_value_t = 0.0, value_name = "KG")]
    pub slider_min: f64,

    /// Upper end of the payload slider (kg)
    #[arg(long, default_value_t = 10_000.0, value_name = "KG")]
    pub slider_max: f64,

    /// Payload slider step (kg)
    #[arg(long, default_value_t = 1_000.0, value_name = "KG")]
    pub slider_step: f64,
}

/// Payload slider configuration handed to the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10_000.0,
            step: 1_000.0,
        }
    }
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations.
    pub fn validate(&self) -> Result<(), String> {
        if !self.slider_min.is_finite() || !self.slider_max.is_finite() {
            return Err("slider bounds must be finite".to_string());
        }
        if self.slider_min < 0.0 {
            return Err(format!("--slider-min must be >= 0, got {}", self.slider_min));
        }
        if self.slider_min > self.slider_max {
            return Err(format!(
                "--slider-min ({}) must not exceed --slider-max ({})",
                self.slider_min, self.slider_max
            ));
        }
        if !(self.slider_step > 0.0) {
            return Err(format!("--slider-step must be > 0, got {}", self.slider_step));
        }
        Ok(())
    }

    pub fn slider(&self) -> SliderConfig {
        SliderConfig {
            min: self.slider_min,
            max: self.slider_max,
            step: self.slider_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_slider() {
        let args = Args::parse_from(["launch-dash"]);
        assert_eq!(args.slider(), SliderConfig::default());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_slider() {
        let args = Args::parse_from(["launch-dash", "--slider-min", "5000", "--slider-max", "100"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn rejects_zero_step() {
        let args = Args::parse_from(["launch-dash", "--slider-step", "0"]);
        assert!(args.validate().is_err());
    }
}
