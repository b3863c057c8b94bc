//! Sound tone generation.
//!
//! The host audio device asks for mono `f32` samples through whatever
//! callback mechanism it has; this generator owns the level logic. The
//! level is 1.0 while the sound timer runs and ramps down 0.25 per
//! buffer when it expires so the tone ends without a click.
use crate::vm::SoundHandle;

/// Volume ramp applied per buffer after the timer expires.
const RAMP_DOWN: f32 = 0.25;

/// Gated constant-level tone source.
pub struct Tone {
    handle: SoundHandle,
    volume: f32,
}

impl Tone {
    pub fn new(handle: SoundHandle) -> Self {
        Self {
            handle,
            volume: 0.0,
        }
    }

    /// Swap in the sound timer of a newly loaded VM.
    pub fn attach(&mut self, handle: SoundHandle) {
        self.handle = handle;
    }

    /// Fill one device buffer with samples.
    pub fn fill(&mut self, buffer: &mut [f32]) {
        if self.handle.is_active() {
            self.volume = 1.0;
        } else if self.volume > 0.0 {
            self.volume = (self.volume - RAMP_DOWN).max(0.0);
        }

        buffer.fill(self.volume);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::vm::Chip8Vm;

    #[test]
    fn test_tone_silent_when_timer_expired() {
        let vm = Chip8Vm::load_rom(&[0x12, 0x00], false).unwrap();
        let mut tone = Tone::new(vm.sound_handle());

        let mut buffer = [1.0f32; 32];
        tone.fill(&mut buffer);

        assert!(buffer.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_tone_ramps_down() {
        let vm = Chip8Vm::load_rom(&[0x12, 0x00], false).unwrap();
        let mut tone = Tone::new(vm.sound_handle());
        tone.volume = 1.0;

        let mut buffer = [0.0f32; 8];

        tone.fill(&mut buffer);
        assert_eq!(buffer[0], 0.75);

        tone.fill(&mut buffer);
        assert_eq!(buffer[0], 0.5);

        tone.fill(&mut buffer);
        tone.fill(&mut buffer);
        assert_eq!(buffer[0], 0.0);

        // Stays silent once fully ramped.
        tone.fill(&mut buffer);
        assert_eq!(buffer[0], 0.0);
    }
}
