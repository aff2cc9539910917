/// Sound engine: procedural sound effects via rodio.
///
/// Four effects, each rendered once into an in-memory WAV at startup:
///   - eat:       short rising chirp
///   - hit:       low thud with a noise burst
///   - clear:     major-arpeggio fanfare
///   - game over: slow descending tune
///
/// Playback is fire-and-forget. Build without the "sound" feature to get
/// the silent stub.

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_eat: Arc<Vec<u8>>,
        sfx_hit: Arc<Vec<u8>>,
        sfx_clear: Arc<Vec<u8>>,
        sfx_game_over: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        /// None when no output device is available.
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::info!(error = %e, "no audio device, playing silently");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_eat: Arc::new(make_wav(&gen_chirp())),
                sfx_hit: Arc::new(make_wav(&gen_thud())),
                sfx_clear: Arc::new(make_wav(&gen_fanfare())),
                sfx_game_over: Arc::new(make_wav(&gen_game_over())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            let sink = match Sink::try_new(&self.handle) { Ok(s) => s, Err(_) => return };
            let cursor = Cursor::new(buf.as_ref().clone());
            if let Ok(src) = rodio::Decoder::new(cursor) {
                sink.append(src);
                sink.detach();
            }
        }

        pub fn play_eat(&self) { self.play(&self.sfx_eat); }
        pub fn play_hit(&self) { self.play(&self.sfx_hit); }
        pub fn play_clear(&self) { self.play(&self.sfx_clear); }
        pub fn play_game_over(&self) { self.play(&self.sfx_game_over); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators (mono f32 samples)
    // ════════════════════════════════════════════════════════════

    fn samples_for(seconds: f32) -> usize {
        (SAMPLE_RATE as f32 * seconds) as usize
    }

    /// Append one note with a linear decay from 1.0 to `1.0 - decay`.
    fn push_note(out: &mut Vec<f32>, freq: f32, seconds: f32, decay: f32, volume: f32) {
        let n = samples_for(seconds);
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32) * decay;
            let wave = (t * freq * TAU).sin() * 0.8 + (t * freq * 2.0 * TAU).sin() * 0.2;
            out.push(wave * env * volume);
        }
    }

    /// Grass eaten: quick upward sweep, 900 → 1500 Hz
    fn gen_chirp() -> Vec<f32> {
        let n = samples_for(0.07);
        let mut phase = 0.0f32;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let freq = 900.0 + p * 600.0;
                phase += freq / SAMPLE_RATE as f32;
                (phase * TAU).sin() * (1.0 - p) * 0.25
            })
            .collect()
    }

    /// Hit: 90 Hz body under a fast-decaying noise burst
    fn gen_thud() -> Vec<f32> {
        let n = samples_for(0.18);
        let mut seed: u32 = 0x2545_F491;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let t = i as f32 / SAMPLE_RATE as f32;
                let body = (t * 90.0 * TAU).sin() * (1.0 - p).powf(1.5);
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                let noise = (seed as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (body * 0.7 + noise * 0.3 * (1.0 - p).powi(4)) * 0.4
            })
            .collect()
    }

    /// Pasture cleared: G4 → C5 → E5 → G5, last note held
    fn gen_fanfare() -> Vec<f32> {
        let mut out = Vec::new();
        for &freq in &[392.0_f32, 523.0, 659.0] {
            push_note(&mut out, freq, 0.09, 0.3, 0.3);
        }
        push_note(&mut out, 784.0, 0.3, 1.0, 0.3);
        out
    }

    /// Game over: E4 → D4 → C4 → low G3, slower each step
    fn gen_game_over() -> Vec<f32> {
        let mut out = Vec::new();
        for (k, &freq) in [330.0_f32, 294.0, 262.0, 196.0].iter().enumerate() {
            let seconds = 0.14 + k as f32 * 0.04;
            push_note(&mut out, freq, seconds, 0.6, 0.3);
        }
        out
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: 16-bit mono PCM
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let bits: u16 = 16;
        let block_align: u16 = bits / 8;
        let byte_rate = SAMPLE_RATE * block_align as u32;
        let data_size = samples.len() as u32 * block_align as u32;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_matches_payload() {
            let samples = gen_chirp();
            let wav = make_wav(&samples);
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..12], b"WAVE");
            assert_eq!(wav.len(), 44 + samples.len() * 2);
            let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
            assert_eq!(data_size as usize, samples.len() * 2);
        }

        #[test]
        fn effects_stay_in_range() {
            for s in [gen_chirp(), gen_thud(), gen_fanfare(), gen_game_over()] {
                assert!(!s.is_empty());
                assert!(s.iter().all(|v| v.abs() <= 1.0));
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API (no-ops when the sound feature is off)
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_eat(&self) {}
    pub fn play_hit(&self) {}
    pub fn play_clear(&self) {}
    pub fn play_game_over(&self) {}
}
