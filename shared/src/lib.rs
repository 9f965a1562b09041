//! Shared building blocks for the clock series
//!
//! - `time_engine`: the 12-hour cycle time model used by the clocks
//! - `config`: read-only TOML configuration lookup

pub mod config;
pub mod time_engine;

pub use config::{config_dir, config_path, load_config, ConfigError};
pub use time_engine::{
    correctness, current_cycle_seconds, is_correct, parse_timezone, seconds_to_time_string,
    time_to_seconds, CycleTicker, TimeFormat, CORRECT_THRESHOLD, CYCLE_SECONDS,
    HALF_CYCLE_SECONDS, TICK_INTERVAL,
};
