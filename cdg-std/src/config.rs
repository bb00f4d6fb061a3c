use crate::Error;
use cdg_core::{
    FrameMode, MIN_CHECKPOINT_INTERVAL, PROGRESS_INTERVAL, PlayerOptions, RESEEK_THRESHOLD,
    TICK_INTERVAL,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

const CHECKPOINT_INTERVAL: Duration = Duration::from_secs(10);

/// Who advances song time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockSource {
    /// The host reports the audio position through `sync_to_audio_time`
    External,
    /// The player thread ticks on its own
    #[default]
    Internal,
}

/// Player configuration, usually read from a JSON file.
///
/// Every field is optional, missing ones take their default:
///
/// ```json
/// {
///     "clock_source": "internal",
///     "frame_mode": "visible",
///     "tick_interval_ms": 33,
///     "progress_interval_ms": 100,
///     "reseek_threshold_ms": 1000,
///     "checkpoint_interval_ms": 10000
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `null` or 0 disables seek checkpoints, other values are raised to at
    /// least a second
    pub checkpoint_interval_ms: Option<u64>,
    pub clock_source: ClockSource,
    pub frame_mode: FrameMode,
    pub progress_interval_ms: u64,
    pub reseek_threshold_ms: u64,
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            checkpoint_interval_ms: Some(millis(CHECKPOINT_INTERVAL)),
            clock_source: ClockSource::default(),
            frame_mode: FrameMode::default(),
            progress_interval_ms: millis(PROGRESS_INTERVAL),
            reseek_threshold_ms: millis(RESEEK_THRESHOLD),
            tick_interval_ms: millis(TICK_INTERVAL),
        }
    }
}

impl Config {
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or has unknown fields.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::Config)
    }

    /// # Errors
    ///
    /// Returns an error if the file can't be read or isn't a valid
    /// configuration.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_json(&json)
    }

    #[must_use]
    pub fn player_options(&self) -> PlayerOptions {
        PlayerOptions {
            checkpoint_interval: self
                .checkpoint_interval_ms
                .filter(|&ms| ms > 0)
                .map(|ms| Duration::from_millis(ms).max(MIN_CHECKPOINT_INTERVAL)),
            frame_mode: self.frame_mode,
            progress_interval: Duration::from_millis(self.progress_interval_ms),
            reseek_threshold: Duration::from_millis(self.reseek_threshold_ms),
        }
    }

    /// Period of the player thread, never below a millisecond.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
