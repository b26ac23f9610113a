//! Bin-to-frequency conversion for unit sample spacing.

/// Frequency of bin `index` on an axis of `len` points.
///
/// Returns `index / len`, folded into `(-0.5, 0.5]` by subtracting one full cycle
/// when `index > len / 2`.
#[inline]
pub fn bin_frequency(index: usize, len: usize) -> f64 {
    let freq = index as f64 / len as f64;
    if index > len / 2 {
        freq - 1.0
    } else {
        freq
    }
}

/// Frequencies of all `len` bins of one axis.
pub fn fftfreq(len: usize) -> Vec<f64> {
    (0..len).map(|i| bin_frequency(i, len)).collect()
}
