/// Simple Moving Average (SMA)
/// Returns a vector aligned with `values`:
/// - `None` until enough values exist
/// - `Some(avg)` after `window` values
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    // Running sum via scan; the value that falls out of the window is
    // subtracted as the window slides.
    values
        .iter()
        .enumerate()
        .scan(0.0_f64, move |sum, (i, &v)| {
            *sum += v;
            if i >= window {
                *sum -= values[i - window];
            }

            let out = if i + 1 >= window {
                Some(*sum / window as f64)
            } else {
                None
            };

            Some(out)
        })
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1). 0 for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}

/// Pearson correlation coefficient.
/// `None` when the slices differ in length, are shorter than two points,
/// or either side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let mx = mean(xs);
    let my = mean(ys);

    let (mut cov, mut var_x, mut var_y) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Rescale a series so its first observation reads 100.
/// Empty input, or a non-positive first value, yields an empty series.
pub fn normalize_base_100(values: &[f64]) -> Vec<f64> {
    match values.first() {
        Some(&first) if first > 0.0 => values.iter().map(|v| v / first * 100.0).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_is_undefined_before_the_window_fills() {
        let values: Vec<f64> = (1..=19).map(|v| v as f64).collect();
        let out = sma(&values, 20);
        assert!(out.iter().all(|v| v.is_none()));
    }

    #[test]
    fn sma_is_defined_at_exactly_window_samples() {
        let values: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        let out = sma(&values, 20);
        assert_eq!(out[18], None);
        assert_eq!(out[19], Some(10.5));
    }

    #[test]
    fn sma_slides_the_window() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let out = sma(&values, 2);
        assert_eq!(out, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn sample_std_matches_hand_computation() {
        // values 2,4,4,4,5,5,7,9: sample variance = 32/7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((sample_std(&values) - expected).abs() < 1e-12);
    }

    #[test]
    fn sample_std_of_single_value_is_zero() {
        assert_eq!(sample_std(&[42.0]), 0.0);
    }

    #[test]
    fn pearson_of_perfectly_linear_series_is_one() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [10.0, 20.0, 30.0, 40.0, 50.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_inverse_series_is_minus_one() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [50.0, 40.0, 30.0, 20.0, 10.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_with_constant_series_is_unavailable() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [7.0, 7.0, 7.0];
        assert_eq!(pearson(&xs, &ys), None);
    }

    #[test]
    fn normalization_rebases_to_100() {
        let out = normalize_base_100(&[50.0, 55.0, 60.0]);
        assert_eq!(out, vec![100.0, 110.0, 120.0]);
    }

    #[test]
    fn normalization_of_empty_or_zero_led_series_is_empty() {
        assert!(normalize_base_100(&[]).is_empty());
        assert!(normalize_base_100(&[0.0, 10.0]).is_empty());
    }
}
