use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

use crate::config::Config;

/// A level-triggered buzzer.
pub trait Sound {
    /// Sampled once per timer tick
    fn set_tone(&mut self, enabled: bool);

    fn reset(&mut self, _config: &Config) {}
}

#[derive(Debug)]
struct ToneState {
    enabled: AtomicBool,
    frequency: AtomicU32,
    amplitude: AtomicU8,
}

/// # Tone
/// Tone parameters shared lock-free with an audio callback.
///
/// Clones observe the same state; the machine writes, the audio side reads.
#[derive(Clone, Debug)]
pub struct Tone(Arc<ToneState>);

impl Tone {
    pub fn new(frequency: u32, amplitude: u8) -> Self {
        Tone(Arc::new(ToneState {
            enabled: AtomicBool::new(false),
            frequency: AtomicU32::new(frequency),
            amplitude: AtomicU8::new(amplitude),
        }))
    }

    pub fn from_config(config: &Config) -> Self {
        Tone::new(config.tone_frequency, config.tone_amplitude)
    }

    pub fn is_enabled(&self) -> bool {
        self.0.enabled.load(Ordering::Relaxed)
    }

    pub fn frequency(&self) -> u32 {
        self.0.frequency.load(Ordering::Relaxed)
    }

    /// Peak amplitude in `0..=127`
    pub fn amplitude(&self) -> u8 {
        self.0.amplitude.load(Ordering::Relaxed)
    }
}

impl Sound for Tone {
    fn set_tone(&mut self, enabled: bool) {
        self.0.enabled.store(enabled, Ordering::Relaxed);
    }

    fn reset(&mut self, config: &Config) {
        self.0.enabled.store(false, Ordering::Relaxed);
        self.0
            .frequency
            .store(config.tone_frequency, Ordering::Relaxed);
        self.0
            .amplitude
            .store(config.tone_amplitude, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod test_sound {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let mut tone = Tone::new(440, 20);
        let listener = tone.clone();
        tone.set_tone(true);
        assert!(listener.is_enabled());
        tone.set_tone(false);
        assert!(!listener.is_enabled());
    }

    #[test]
    fn test_reset_silences_and_retunes() {
        let mut tone = Tone::new(440, 20);
        tone.set_tone(true);
        tone.reset(&Config::default());
        assert!(!tone.is_enabled());
        assert_eq!(tone.frequency(), 329);
        assert_eq!(tone.amplitude(), 40);
    }
}
