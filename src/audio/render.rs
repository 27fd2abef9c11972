//! Beat-track rendering: overlay a percussion kernel at every beat
//! and normalize the mix once at the end.

use std::path::Path;

use crate::audio::PercussionSample;
use crate::error::{RhythmError, RhythmResult};

/// Mix a percussion kernel into a fresh buffer at every beat time.
///
/// Each beat time t maps to sample index `round(t · sample_rate)`;
/// the kernel is added in place from there, truncated at the buffer
/// end. Overlapping hits superpose. After all overlays the buffer is
/// peak-normalized in a single global pass, so an all-silent result
/// (no beats, or a zero kernel) comes back as silence rather than a
/// divide-by-zero.
///
/// The kernel's own sample rate is not resampled; it plays back at
/// `sample_rate`.
pub fn render_beats(
    beats_per_oscillator: &[Vec<f64>],
    kernel: &PercussionSample,
    sample_rate: u32,
    duration: f64,
) -> Vec<f64> {
    let len = (duration * sample_rate as f64).round() as usize;
    let mut buffer = vec![0.0f64; len];

    for beats in beats_per_oscillator {
        for &t in beats {
            let start = (t * sample_rate as f64).round() as usize;
            if start >= len {
                continue;
            }
            let copy = kernel.len().min(len - start);
            for (dst, &src) in buffer[start..start + copy]
                .iter_mut()
                .zip(&kernel.samples()[..copy])
            {
                *dst += src;
            }
        }
    }

    normalize_peak(&mut buffer);
    buffer
}

/// Rescale a buffer so its peak magnitude is 1.
///
/// A zero buffer is a valid degenerate result and is left untouched;
/// an already-normalized buffer comes back unchanged, so the pass is
/// idempotent.
pub fn normalize_peak(buffer: &mut [f64]) {
    let peak = buffer.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()));
    if peak > 0.0 {
        for x in buffer.iter_mut() {
            *x /= peak;
        }
    }
}

/// Write a normalized waveform as 16-bit PCM mono.
pub fn write_wav(path: impl AsRef<Path>, samples: &[f64], sample_rate: u32) -> RhythmResult<()> {
    let path = path.as_ref();
    let fail = |source: hound::Error| RhythmError::WaveformWrite {
        path: path.to_path_buf(),
        source,
    };

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).map_err(fail)?;
    let amplitude = i16::MAX as f64;
    for &s in samples {
        writer
            .write_sample((s.clamp(-1.0, 1.0) * amplitude) as i16)
            .map_err(fail)?;
    }
    writer.finalize().map_err(fail)?;
    Ok(())
}
