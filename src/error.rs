//! Error taxonomy for the rhythm pipeline.
//!
//! Configuration problems are surfaced before any stepping happens,
//! resource problems before rendering begins. Numeric degeneracies
//! (an all-silent render) are guarded in place and are not errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by simulation setup, sample loading and output.
#[derive(Debug, Error)]
pub enum RhythmError {
    /// Rejected run parameters. Raised by validation before the first
    /// integration step, never mid-run.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The percussion kernel file is missing or undecodable.
    #[error("percussion sample `{path}` unavailable: {source}")]
    SampleUnavailable {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    /// The rendered waveform could not be written.
    #[error("failed to write waveform `{path}`: {source}")]
    WaveformWrite {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    /// A trace CSV could not be written.
    #[error("failed to write trace `{path}`: {source}")]
    TraceWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result alias used throughout the crate.
pub type RhythmResult<T> = Result<T, RhythmError>;
