/// Sound engine: short synthesized cues via rodio.
///
/// Each cue is a list of notes rendered once at init time into an
/// in-memory WAV buffer. Playback is fire-and-forget via a detached Sink.
///
/// No audio device means `SoundEngine::new()` returns `None` and the game
/// runs silently. Build without the "sound" feature to drop rodio
/// entirely (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use crate::domain::level::LevelId;

    const SAMPLE_RATE: u32 = 22050;

    /// Attacks at or above this damage get the heavier thud.
    const HEAVY_HIT: u32 = 20;

    /// Timbre of a cue.
    #[derive(Clone, Copy)]
    enum Voice {
        /// Plain sine.
        Soft,
        /// Sine plus octave and fifth, for fanfares.
        Bright,
        /// Sine with a buzzy third harmonic, for mistakes.
        Buzz,
    }

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        click: Arc<Vec<u8>>,
        correct: Arc<Vec<u8>>,
        incorrect: Arc<Vec<u8>>,
        hit: Arc<Vec<u8>>,
        heavy_hit: Arc<Vec<u8>>,
        /// One fanfare per level, a semitone higher each time.
        level_up: Vec<Arc<Vec<u8>>>,
        victory: Arc<Vec<u8>>,
        coffee: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            let cue = |notes: &[(f32, f32)], voice| Arc::new(make_wav(&render(notes, voice)));

            Some(SoundEngine {
                _stream: stream,
                handle,
                click: cue(&[(880.0, 0.03)], Voice::Soft),
                correct: cue(&[(659.0, 0.07), (988.0, 0.12)], Voice::Bright), // E5 B5
                incorrect: cue(&[(220.0, 0.10), (185.0, 0.18)], Voice::Buzz),
                hit: cue(&[(160.0, 0.12)], Voice::Buzz),
                heavy_hit: cue(&[(120.0, 0.10), (90.0, 0.20)], Voice::Buzz),
                level_up: (0..LevelId::ALL.len())
                    .map(|i| {
                        let k = semitone(i as i32);
                        cue(&[(523.0 * k, 0.08), (659.0 * k, 0.08), (784.0 * k, 0.16)], Voice::Bright)
                    })
                    .collect(),
                victory: cue(
                    &[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.1), (1047.0, 0.35)],
                    Voice::Bright,
                ),
                coffee: cue(&[(1319.0, 0.05), (1568.0, 0.05), (2093.0, 0.08)], Voice::Soft),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_click(&self) { self.play(&self.click); }
        pub fn play_correct(&self) { self.play(&self.correct); }
        pub fn play_incorrect(&self) { self.play(&self.incorrect); }
        pub fn play_hit(&self, damage: u32) {
            if damage >= HEAVY_HIT {
                self.play(&self.heavy_hit);
            } else {
                self.play(&self.hit);
            }
        }

        pub fn play_level_up(&self, level: LevelId) {
            let idx = level.number().saturating_sub(1);
            if let Some(buf) = self.level_up.get(idx) {
                self.play(buf);
            }
        }
        pub fn play_victory(&self) { self.play(&self.victory); }
        pub fn play_coffee(&self) { self.play(&self.coffee); }
    }

    // ════════════════════════════════════════════════════════════
    //  Synthesis
    // ════════════════════════════════════════════════════════════

    /// Frequency ratio of `n` equal-tempered semitones.
    fn semitone(n: i32) -> f32 {
        2f32.powf(n as f32 / 12.0)
    }

    /// Render `(frequency, seconds)` notes back to back. Each note fades out
    /// over its own length so consecutive notes stay distinct.
    fn render(notes: &[(f32, f32)], voice: Voice) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, dur) in notes {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let phase = t * freq * TAU;
                let env = 1.0 - (i as f32 / n as f32).powf(0.7);
                let wave = match voice {
                    Voice::Soft => phase.sin(),
                    Voice::Bright => phase.sin() * 0.6 + (phase * 2.0).sin() * 0.3 + (phase * 1.5).sin() * 0.1,
                    Voice::Buzz => phase.sin() * 0.6 + (phase * 3.0).sin() * 0.4,
                };
                samples.push(wave * env * 0.25);
            }
        }
        samples
    }

    /// 16-bit mono PCM WAV around `samples`.
    fn make_wav(samples: &[f32]) -> Vec<u8> {
        const CHANNELS: u16 = 1;
        const BITS: u16 = 16;
        let block_align = CHANNELS * BITS / 8;
        let byte_rate = SAMPLE_RATE * block_align as u32;
        let data_size = samples.len() as u32 * block_align as u32;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVEfmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&CHANNELS.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&BITS.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_and_size() {
            let wav = make_wav(&[0.0, 0.5, -2.0]);
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..16], b"WAVEfmt ");
            assert_eq!(wav.len(), 44 + 6);
            // Out-of-range samples are clamped
            assert_eq!(i16::from_le_bytes([wav[48], wav[49]]), -i16::MAX);
        }

        #[test]
        fn render_length_follows_durations() {
            let s = render(&[(440.0, 0.1), (880.0, 0.2)], Voice::Soft);
            assert_eq!(s.len(), 2205 + 4410);
            assert!(s.iter().all(|x| x.abs() <= 0.25));
        }

        #[test]
        fn twelve_semitones_make_an_octave() {
            assert_eq!(semitone(0), 1.0);
            assert!((semitone(12) - 2.0).abs() < 1e-5);
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API, compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
use crate::domain::level::LevelId;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { None }
    pub fn play_click(&self) {}
    pub fn play_correct(&self) {}
    pub fn play_incorrect(&self) {}
    pub fn play_hit(&self, _damage: u32) {}
    pub fn play_level_up(&self, _level: LevelId) {}
    pub fn play_victory(&self) {}
    pub fn play_coffee(&self) {}
}
