use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::heap::HeapKind;
use crate::{AlgoVizError, Result, Value};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub random: RandomConfig,
    pub heap: HeapConfig,
    pub playback: PlaybackConfig,
}

impl AppConfig {
    /// Reads a JSON config file. Missing sections and fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.random.validate()?;
        if self.playback.step_delay_ms == 0 {
            return Err(AlgoVizError::invalid_input(
                "playback.step_delay_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Parameters for randomly generated trees and heaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    pub count: usize,
    pub min: Value,
    pub max: Value,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            count: 7,
            min: 1,
            max: 100,
        }
    }
}

impl RandomConfig {
    fn validate(&self) -> Result<()> {
        if self.min > self.max {
            return Err(AlgoVizError::invalid_input(format!(
                "random.min ({}) is greater than random.max ({})",
                self.min, self.max
            )));
        }
        let available = i128::from(self.max) - i128::from(self.min) + 1;
        if self.count as i128 > available {
            return Err(AlgoVizError::invalid_input(format!(
                "random.count ({}) exceeds the {available} distinct values in [{}, {}]",
                self.count, self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeapConfig {
    pub kind: HeapKind,
}

/// Replay cadence for recorded traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub step_delay_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { step_delay_ms: 800 }
    }
}

impl PlaybackConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.random.count, 7);
        assert_eq!(config.heap.kind, HeapKind::Min);
        assert_eq!(config.playback.step_delay(), Duration::from_millis(800));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "heap": { "kind": "max" }, "random": { "count": 3 } }"#)
                .unwrap();
        assert_eq!(config.heap.kind, HeapKind::Max);
        assert_eq!(config.random.count, 3);
        assert_eq!(config.random.max, 100);
        assert_eq!(config.playback.step_delay_ms, 800);
    }

    #[test]
    fn rejects_impossible_ranges_and_zero_delay() {
        let mut config = AppConfig::default();
        config.random.min = 10;
        config.random.max = 5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.random.count = 11;
        config.random.max = 10;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.playback.step_delay_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_file_and_reports_bad_json() {
        let dir = std::env::temp_dir();
        let good = dir.join(format!("algo-viz-config-{}.json", std::process::id()));
        let mut file = fs::File::create(&good).unwrap();
        write!(file, r#"{{ "playback": {{ "step_delay_ms": 250 }} }}"#).unwrap();
        drop(file);

        let config = AppConfig::load(&good).unwrap();
        assert_eq!(config.playback.step_delay_ms, 250);

        fs::write(&good, "not json").unwrap();
        assert!(matches!(AppConfig::load(&good), Err(AlgoVizError::Json(_))));

        fs::remove_file(&good).unwrap();
        assert!(matches!(AppConfig::load(&good), Err(AlgoVizError::Io(_))));
    }
}
