use std::io;
use std::time::Duration;

use thiserror::Error;

/// Conditions that stop a machine.
///
/// Memory and stack errors mean the program counter has left the valid
/// execution envelope; they abort the machine rather than being clamped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("memory access out of bounds at {address:#06X}")]
    OutOfBounds { address: usize },

    #[error("memory range of {len} bytes at {address:#06X} is out of bounds")]
    RangeOutOfBounds { address: usize, len: usize },

    #[error("stack overflow at PC {pc:#06X}")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("program image is {size} bytes, only {capacity} fit")]
    ProgramTooLarge { size: usize, capacity: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unable to read program image: {0}")]
    Load(#[source] io::Error),

    #[error("unable to start scheduler thread: {0}")]
    Io(#[from] io::Error),

    #[error("scheduler did not stop within {0:?}")]
    Unresponsive(Duration),

    #[error("scheduler thread panicked")]
    Panicked,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be > 0")]
    NotPositive { field: &'static str },

    #[error("{field} must be in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },

    #[error("rom_path cannot be blank")]
    BlankRomPath,

    #[error("unable to read config file: {0}")]
    Read(#[from] io::Error),

    #[error("unable to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
