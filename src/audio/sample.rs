//! Percussion kernel: the fixed waveform overlaid at every beat.

use std::f64::consts::TAU;
use std::path::Path;

use crate::error::{RhythmError, RhythmResult};

/// A short mono waveform used as the per-beat percussion voice.
#[derive(Debug, Clone)]
pub struct PercussionSample {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl PercussionSample {
    /// Wrap an already-decoded mono waveform.
    pub fn from_samples(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Decode a WAV file into a peak-normalized mono kernel.
    ///
    /// Multi-channel files are summed to mono; integer formats are
    /// scaled to [-1, 1]. A missing or undecodable file is a
    /// [`RhythmError::SampleUnavailable`].
    pub fn from_wav_file(path: impl AsRef<Path>) -> RhythmResult<Self> {
        let path = path.as_ref();
        let fail = |source: hound::Error| RhythmError::SampleUnavailable {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = hound::WavReader::open(path).map_err(fail)?;
        let spec = reader.spec();
        let channels = spec.channels as usize;
        if channels == 0 {
            return Err(fail(hound::Error::FormatError("sample has no channels")));
        }

        let raw: Vec<f64> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<Result<_, _>>()
                .map_err(fail)?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f64;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f64 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(fail)?
            }
        };

        let mono: Vec<f64> = raw
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f64>() / channels as f64)
            .collect();

        let mut sample = Self::from_samples(mono, spec.sample_rate);
        sample.normalize();
        Ok(sample)
    }

    /// Synthesized percussion voice: a bright 2.5 kHz ping with a
    /// fast exponential decay, so the pipeline runs without an asset
    /// on disk.
    pub fn click(sample_rate: u32) -> Self {
        let len = (sample_rate as f64 * 0.03) as usize;
        let samples = (0..len)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                (TAU * 2500.0 * t).sin() * (-t / 0.008).exp()
            })
            .collect();
        Self::from_samples(samples, sample_rate)
    }

    /// Scale so the peak magnitude is 1. All-zero kernels are left
    /// untouched.
    pub fn normalize(&mut self) {
        let peak = self.samples.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()));
        if peak > 0.0 {
            for x in &mut self.samples {
                *x /= peak;
            }
        }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
