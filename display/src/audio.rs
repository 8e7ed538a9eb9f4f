use log::info;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

use emu8_core::Tone;

const SAMPLE_RATE: i32 = 44_100;

/// # TriangleWave
/// An SDL2 audio callback that plays a triangle wave while the tone is enabled.
///
/// Frequency and amplitude are re-read every buffer so a reload retunes it.
/// Amplitude is on a 0..=127 scale and maps linearly onto `0.0..=1.0`.
pub struct TriangleWave {
    tone: Tone,
    sample_rate: f32,
    phase: f32,
}

impl TriangleWave {
    pub fn new(tone: Tone, sample_rate: i32) -> Self {
        TriangleWave {
            tone,
            sample_rate: sample_rate.max(1) as f32,
            phase: 0.0,
        }
    }
}

impl AudioCallback for TriangleWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        if !self.tone.is_enabled() {
            // restart on a zero crossing next time to avoid a click
            self.phase = 0.0;
            out.iter_mut().for_each(|s| *s = 0.0);
            return;
        }

        let volume = f32::from(self.tone.amplitude()) / 127.0;
        let step = self.tone.frequency() as f32 / self.sample_rate;
        for sample in out.iter_mut() {
            // 0 -> 1 -> 0 -> -1 -> 0 over one period
            let wave = if self.phase < 0.25 {
                4.0 * self.phase
            } else if self.phase < 0.75 {
                2.0 - 4.0 * self.phase
            } else {
                4.0 * self.phase - 4.0
            };
            *sample = volume * wave;
            self.phase = (self.phase + step) % 1.0;
        }
    }
}

/// Opens a mono playback device driven by `tone` and starts it.
pub fn open_audio(sdl: &sdl2::Sdl, tone: Tone) -> Result<AudioDevice<TriangleWave>, String> {
    let audio_subsystem = sdl.audio()?;
    let desired = AudioSpecDesired {
        freq: Some(SAMPLE_RATE),
        channels: Some(1),
        samples: None,
    };
    let device = audio_subsystem.open_playback(None, &desired, |spec| {
        info!("audio opened at {}Hz", spec.freq);
        TriangleWave::new(tone, spec.freq)
    })?;
    device.resume();
    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu8_core::Sound;

    #[test]
    fn test_silent_when_disabled() {
        let mut wave = TriangleWave::new(Tone::new(440, 127), 44_100);
        let mut out = [1.0f32; 64];
        wave.callback(&mut out);
        assert!(out.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_triangle_shape() {
        let mut tone = Tone::new(1, 127);
        tone.set_tone(true);
        // one period per 8 samples
        let mut wave = TriangleWave::new(tone, 8);
        let mut out = [0.0f32; 8];
        wave.callback(&mut out);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0, -0.5, -1.0, -0.5];
        for (sample, expected) in out.iter().zip(expected.iter()) {
            assert!((sample - expected).abs() < 1e-6, "{} != {}", sample, expected);
        }
    }

    #[test]
    fn test_amplitude_scales_volume() {
        let mut tone = Tone::new(440, 40);
        tone.set_tone(true);
        let mut wave = TriangleWave::new(tone, 44_100);
        let mut out = [0.0f32; 512];
        wave.callback(&mut out);
        let peak = out.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
        assert!(peak > 0.0 && peak <= 40.0 / 127.0 + 1e-6);
    }
}
