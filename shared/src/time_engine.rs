//! Time Engine - the 12-hour cycle shared by every clock value
//!
//! Wall-clock time and fixed clock values are both reduced to "seconds since
//! the top of a 12-hour cycle" so they can be compared on a circle.

use std::time::{Duration, Instant};

use chrono::{Local, Timelike, Utc};
use chrono_tz::Tz;

/// Length of one 12-hour cycle in seconds
pub const CYCLE_SECONDS: u32 = 12 * 3600;

/// Largest possible circular distance between two cycle values
pub const HALF_CYCLE_SECONDS: u32 = CYCLE_SECONDS / 2;

/// Correctness above this value counts as "showing the right time"
pub const CORRECT_THRESHOLD: f32 = 0.999;

/// How often the live time value is refreshed
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Level of detail when formatting a cycle value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `H:MM`
    Minimal,
    /// `H:MM:SS`
    Full,
}

/// Reduce a time of day to seconds since the top of the 12-hour cycle
pub fn time_to_seconds<T: Timelike>(time: &T) -> u32 {
    (time.hour() % 12) * 3600 + time.minute() * 60 + time.second().min(59)
}

/// Format a cycle value using the 12-hour convention (hour 0 shows as 12)
pub fn seconds_to_time_string(seconds: u32, format: TimeFormat) -> String {
    let seconds = seconds % CYCLE_SECONDS;
    let hours = match seconds / 3600 {
        0 => 12,
        h => h,
    };
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    match format {
        TimeFormat::Minimal => format!("{}:{:02}", hours, minutes),
        TimeFormat::Full => format!("{}:{:02}:{:02}", hours, minutes, secs),
    }
}

/// Normalized inverse circular distance between a clock value and the live time
///
/// 1.0 when both are equal, 0.0 at half a cycle apart.
pub fn correctness(clock_seconds: u32, current_seconds: u32) -> f32 {
    let a = clock_seconds % CYCLE_SECONDS;
    let b = current_seconds % CYCLE_SECONDS;
    let diff = a.abs_diff(b);
    let wrapped = diff.min(CYCLE_SECONDS - diff);
    1.0 - wrapped as f32 / HALF_CYCLE_SECONDS as f32
}

/// Whether a correctness value is close enough to be highlighted
pub fn is_correct(correctness: f32) -> bool {
    correctness > CORRECT_THRESHOLD
}

/// Read the live clock and reduce it to the cycle
///
/// Uses the given zone, or the system local time when none is configured.
pub fn current_cycle_seconds(zone: Option<Tz>) -> u32 {
    match zone {
        Some(tz) => time_to_seconds(&Utc::now().with_timezone(&tz)),
        None => time_to_seconds(&Local::now()),
    }
}

/// Parse a timezone string into a Tz
pub fn parse_timezone(tz_str: &str) -> Result<Tz, String> {
    tz_str
        .parse::<Tz>()
        .map_err(|_| format!("Invalid timezone: {}", tz_str))
}

/// Holds the live cycle value and refreshes it once per tick interval
#[derive(Debug, Clone)]
pub struct CycleTicker {
    zone: Option<Tz>,
    current_seconds: u32,
    last_refresh: Instant,
}

impl CycleTicker {
    /// Create a ticker and read the clock immediately
    pub fn new(zone: Option<Tz>, now: Instant) -> Self {
        Self {
            zone,
            current_seconds: current_cycle_seconds(zone),
            last_refresh: now,
        }
    }

    pub fn zone(&self) -> Option<Tz> {
        self.zone
    }

    pub fn current_seconds(&self) -> u32 {
        self.current_seconds
    }

    /// Refresh from the live clock if a full interval has passed
    ///
    /// Returns true when the value was refreshed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let zone = self.zone;
        self.tick_with(now, || current_cycle_seconds(zone))
    }

    /// Same as [`CycleTicker::tick`] with an explicit clock source
    pub fn tick_with(&mut self, now: Instant, read: impl FnOnce() -> u32) -> bool {
        if now.saturating_duration_since(self.last_refresh) < TICK_INTERVAL {
            return false;
        }
        self.current_seconds = read() % CYCLE_SECONDS;
        self.last_refresh = now;
        true
    }
}
