/// Sound engine: small procedural sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::PI * 2.0;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_start: Arc<Vec<u8>>,
        sfx_move: Arc<Vec<u8>>,
        sfx_freeze: Arc<Vec<u8>>,
        sfx_lose: Arc<Vec<u8>>,
        sfx_win: Arc<Vec<u8>>,
        sfx_land: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_start: Arc::new(make_wav(&gen_arpeggio(&[523.0, 659.0, 784.0], 0.06))),
                sfx_move: Arc::new(make_wav(&gen_drip())),
                sfx_freeze: Arc::new(make_wav(&gen_freeze())),
                sfx_lose: Arc::new(make_wav(&gen_lose())),
                sfx_win: Arc::new(make_wav(&gen_arpeggio(&[523.0, 659.0, 784.0, 1047.0], 0.1))),
                sfx_land: Arc::new(make_wav(&gen_chime())),
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

        pub fn play_start(&self) { self.play(&self.sfx_start); }
        pub fn play_move(&self) { self.play(&self.sfx_move); }
        pub fn play_freeze(&self) { self.play(&self.sfx_freeze); }
        pub fn play_lose(&self) { self.play(&self.sfx_lose); }
        pub fn play_win(&self) { self.play(&self.sfx_win); }
        pub fn play_land(&self) { self.play(&self.sfx_land); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn samples_for(duration: f32) -> usize {
        (SAMPLE_RATE as f32 * duration) as usize
    }

    /// Ascending notes, sine + octave for a bell-ish tone.
    fn gen_arpeggio(notes: &[f32], note_dur: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in notes {
            let n = samples_for(note_dur);
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.25);
            }
        }
        samples
    }

    /// Move: a short falling "plip".
    fn gen_drip() -> Vec<f32> {
        let n = samples_for(0.05);
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let freq = 1400.0 - p * 700.0;
                let t = i as f32 / SAMPLE_RATE as f32;
                (t * freq * TAU).sin() * (1.0 - p) * 0.15
            })
            .collect()
    }

    /// Cloud hit: high shimmer with a noisy crackle, fading out.
    fn gen_freeze() -> Vec<f32> {
        let n = samples_for(0.3);
        let mut rng: u32 = 12345;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let t = i as f32 / SAMPLE_RATE as f32;
                let shimmer = (t * 2093.0 * TAU).sin() * (t * 31.0 * TAU).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (shimmer * 0.6 + noise * 0.2) * (1.0 - p).powf(1.5) * 0.25
            })
            .collect()
    }

    /// Sun hit: descending tones with a final fade.
    fn gen_lose() -> Vec<f32> {
        let notes = [440.0_f32, 370.0, 311.0, 261.0]; // A4→F#4→Eb4→C4
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = samples_for(0.12);
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                samples.push((t * freq * TAU).sin() * env * 0.3);
            }
        }
        let fade_len = samples.len() / 4;
        let total = samples.len();
        for (i, s) in samples.iter_mut().enumerate().skip(total - fade_len) {
            *s *= (total - i) as f32 / fade_len as f32;
        }
        samples
    }

    /// Landing: two-note chime.
    fn gen_chime() -> Vec<f32> {
        let pairs = [(784.0_f32, 0.08), (1047.0, 0.25)]; // G5, C6
        let mut samples = Vec::new();
        for &(freq, dur) in &pairs {
            let n = samples_for(dur);
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_sizes() {
            let buf = make_wav(&[0.0, 1.0, -2.0]);
            assert_eq!(&buf[0..4], b"RIFF");
            assert_eq!(buf.len(), 44 + 6);
            assert_eq!(u32::from_le_bytes([buf[40], buf[41], buf[42], buf[43]]), 6);
            // Out-of-range samples clamp.
            assert_eq!(i16::from_le_bytes([buf[48], buf[49]]), -32767);
        }

        #[test]
        fn generators_stay_in_range() {
            for s in [gen_drip(), gen_freeze(), gen_lose(), gen_chime()] {
                assert!(!s.is_empty());
                assert!(s.iter().all(|v| v.abs() <= 1.0));
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_start(&self) {}
    pub fn play_move(&self) {}
    pub fn play_freeze(&self) {}
    pub fn play_lose(&self) {}
    pub fn play_win(&self) {}
    pub fn play_land(&self) {}
}
