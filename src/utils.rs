/// Mean of consecutive, non-overlapping windows of `values`. The last window
/// may be shorter and is averaged over its own length.
pub fn moving_average(window: usize, values: &[f64]) -> Vec<f64> {
    if window == 0 {
        return vec![];
    }
    values
        .chunks(window)
        .map(|chunk| chunk.iter().sum::<f64>() / chunk.len() as f64)
        .collect()
}
