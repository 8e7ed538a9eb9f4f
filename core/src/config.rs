use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{CPU_HZ, DISPLAY_HEIGHT, DISPLAY_WIDTH, TIMER_HZ};
use crate::error::ConfigError;

/// Which register 8xy6/8xyE shift.
///
/// The two dialects are mutually exclusive, so the machine runs exactly one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftQuirk {
    /// Vx = Vx >> 1 (or << 1); Vy is ignored
    InPlace,
    /// Vx = Vy >> 1 (or << 1)
    FromVy,
}

/// Deviations from the naive instruction set
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quirks {
    pub shift: ShiftQuirk,
    /// Sprites crossing the right edge continue on the left; otherwise clipped
    pub wrap_columns: bool,
    /// Sprites crossing the bottom edge continue at the top; otherwise clipped
    pub wrap_rows: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            shift: ShiftQuirk::InPlace,
            wrap_columns: true,
            wrap_rows: true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// # Config
/// An immutable snapshot of everything a machine is built from.
///
/// Reconfiguring a running machine replaces the whole snapshot and reloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rom_path: PathBuf,
    pub cpu_hz: u32,
    pub timer_hz: u32,
    pub width: usize,
    pub height: usize,
    pub scale: u32,
    pub background: Rgb,
    pub foreground: Rgb,
    pub tone_frequency: u32,
    pub tone_amplitude: u8,
    pub quirks: Quirks,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rom_path: PathBuf::from("data/roms/splash.ch8"),
            cpu_hz: CPU_HZ,
            timer_hz: TIMER_HZ,
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
            scale: 15,
            background: Rgb(0x35, 0x28, 0x79),
            foreground: Rgb(0xA6, 0xA1, 0xFF),
            tone_frequency: 329,
            tone_amplitude: 40,
            quirks: Quirks::default(),
        }
    }
}

impl Config {
    /// Reads a JSON config; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rom_path.as_os_str().is_empty() || self.rom_path.to_string_lossy().trim().is_empty()
        {
            return Err(ConfigError::BlankRomPath);
        }
        let positive = [
            ("cpu_hz", self.cpu_hz as usize),
            ("timer_hz", self.timer_hz as usize),
            ("width", self.width),
            ("height", self.height),
            ("scale", self.scale as usize),
            ("tone_frequency", self.tone_frequency as usize),
        ];
        if let Some(&(field, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::NotPositive { field });
        }
        if self.tone_amplitude > 127 {
            return Err(ConfigError::OutOfRange {
                field: "tone_amplitude",
                min: 0,
                max: 127,
                value: u32::from(self.tone_amplitude),
            });
        }
        Ok(())
    }

    pub fn cpu_period(&self) -> Duration {
        period(self.cpu_hz)
    }

    pub fn timer_period(&self) -> Duration {
        period(self.timer_hz)
    }
}

fn period(hz: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(hz.max(1)))
}

#[cfg(test)]
mod test_config {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.quirks.shift, ShiftQuirk::InPlace);
        assert!(config.quirks.wrap_columns && config.quirks.wrap_rows);
    }

    #[test]
    fn test_periods() {
        let config = Config::default();
        assert_eq!(config.timer_period(), Duration::from_nanos(16_666_666));
        assert_eq!(config.cpu_period(), Duration::from_millis(1));
    }

    #[test]
    fn test_rejects_zero_rate() {
        let config = Config {
            cpu_hz: 0,
            ..Config::default()
        };
        match config.validate() {
            Err(ConfigError::NotPositive { field }) => assert_eq!(field, "cpu_hz"),
            other => panic!("expected cpu_hz to be rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_loud_tone() {
        let config = Config {
            tone_amplitude: 128,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_blank_rom_path() {
        let config = Config {
            rom_path: PathBuf::from("  "),
            ..Config::default()
        };
        match config.validate() {
            Err(ConfigError::BlankRomPath) => (),
            other => panic!("expected blank path to be rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let json = r#"{ "cpu_hz": 700, "quirks": { "shift": "from_vy" } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.cpu_hz, 700);
        assert_eq!(config.timer_hz, 60);
        assert_eq!(config.quirks.shift, ShiftQuirk::FromVy);
        assert!(config.quirks.wrap_rows);
    }

    #[test]
    fn test_missing_file() {
        match Config::from_json_file("does/not/exist.json") {
            Err(ConfigError::Read(_)) => (),
            other => panic!("expected read error, got {:?}", other),
        }
    }
}
