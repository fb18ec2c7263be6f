use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_DATA_PATH: &str = "processed_dataset.csv";

/// Interactive dashboard of consumer shopping trends.
#[derive(Debug, Clone, Parser)]
#[command(name = "shopping-trends", version, about)]
pub struct Config {
    /// Dataset to open at startup (.csv, .json or .parquet).
    #[arg(long, short, env = "SHOPPING_TRENDS_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Initial window width in points.
    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,

    /// Initial window height in points.
    #[arg(long, default_value_t = 860.0)]
    pub height: f32,
}
