//! Supervised windowing of a time series.
//!
//! Turns a 1-D series into (input window, next value) training pairs for
//! sequence models.

/// Windowed training pairs in original series order.
#[derive(Debug, Clone, Default)]
pub struct WindowedData {
    /// Input windows, each of the configured window length.
    pub inputs: Vec<Vec<f64>>,
    /// The value immediately following each input window.
    pub targets: Vec<f64>,
}

impl WindowedData {
    /// Number of (input, target) pairs.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when no pairs could be produced.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Build supervised pairs from a series with the given window length.
///
/// For a series of length `L` and window `n` with `1 <= n < L`, produces
/// exactly `L - n` pairs: pair `i` has input `series[i..i+n]` and target
/// `series[i+n]`. When `n >= L` the result is empty; callers must treat
/// an empty result as a failure signal, since no model can be trained on
/// zero pairs.
pub fn sliding_windows(series: &[f64], n_steps: usize) -> WindowedData {
    if n_steps == 0 || n_steps >= series.len() {
        return WindowedData::default();
    }

    let count = series.len() - n_steps;
    let mut inputs = Vec::with_capacity(count);
    let mut targets = Vec::with_capacity(count);

    for i in 0..count {
        inputs.push(series[i..i + n_steps].to_vec());
        targets.push(series[i + n_steps]);
    }

    WindowedData { inputs, targets }
}
