//! Series recorder: the visualization sink.
//!
//! Simulations record named numeric series during a run; the recorder
//! dumps them as CSV for external plotting. No plotting happens in
//! this crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{RhythmError, RhythmResult};

/// Named columns of f64 samples, written as CSV.
#[derive(Debug, Default)]
pub struct SeriesRecorder {
    series: Vec<(String, Vec<f64>)>,
}

impl SeriesRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value to a named series, creating it on first use.
    pub fn record(&mut self, name: &str, value: f64) {
        match self.series.iter_mut().find(|(n, _)| n == name) {
            Some((_, values)) => values.push(value),
            None => self.series.push((name.to_string(), vec![value])),
        }
    }

    /// Append a whole series at once.
    pub fn record_series(&mut self, name: &str, values: impl IntoIterator<Item = f64>) {
        for v in values {
            self.record(name, v);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Write all series as CSV columns. Shorter columns are padded
    /// with empty cells.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> RhythmResult<()> {
        let path = path.as_ref();
        let fail = |source: std::io::Error| RhythmError::TraceWrite {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(fail)?;
        let mut out = BufWriter::new(file);

        let header: Vec<&str> = self.series.iter().map(|(n, _)| n.as_str()).collect();
        writeln!(out, "{}", header.join(",")).map_err(fail)?;

        let rows = self.series.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        for row in 0..rows {
            let line: Vec<String> = self
                .series
                .iter()
                .map(|(_, v)| v.get(row).map(|x| x.to_string()).unwrap_or_default())
                .collect();
            writeln!(out, "{}", line.join(",")).map_err(fail)?;
        }

        out.flush().map_err(fail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_insertion_order() {
        let mut rec = SeriesRecorder::new();
        rec.record("b", 1.0);
        rec.record("a", 2.0);
        rec.record("b", 3.0);

        assert_eq!(rec.series[0].0, "b");
        assert_eq!(rec.series[0].1, vec![1.0, 3.0]);
        assert_eq!(rec.series[1].1, vec![2.0]);
    }

    #[test]
    fn csv_pads_ragged_columns() {
        let mut rec = SeriesRecorder::new();
        rec.record_series("x", [1.0, 2.0]);
        rec.record("y", 9.0);

        let path = std::env::temp_dir().join("rhythm_dynamics_trace_test.csv");
        rec.write_csv(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "x,y");
        assert_eq!(lines[1], "1,9");
        assert_eq!(lines[2], "2,");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn bad_path_is_a_trace_error() {
        let rec = SeriesRecorder::new();
        let err = rec.write_csv("/no/such/dir/t.csv").unwrap_err();
        assert!(matches!(err, RhythmError::TraceWrite { .. }));
    }
}
