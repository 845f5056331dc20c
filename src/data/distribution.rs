/// Number of evaluation points along a violin outline.
const KDE_STEPS: usize = 64;

/// Gaussian kernel density of `values`, sampled on an even grid spanning
/// the data (padded by one bandwidth each side).
///
/// Returns `(value, density)` pairs, or `None` when there is nothing to
/// draw: fewer than two finite values, or no spread.
pub fn kde(values: &[f64]) -> Option<Vec<(f64, f64)>> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    if std_dev < f64::EPSILON {
        return None;
    }

    // Silverman's rule of thumb
    let bandwidth = 1.06 * std_dev * (n as f64).powf(-0.2);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min) - bandwidth;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + bandwidth;
    let step = (max - min) / (KDE_STEPS - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    Some(
        (0..KDE_STEPS)
            .map(|i| {
                let x = min + i as f64 * step;
                let density: f64 = values
                    .iter()
                    .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                    .sum();
                (x, density * norm)
            })
            .collect(),
    )
}

/// Closed violin outline centred on `centre`, widest point `half_width`
/// either side. Points are `[x, y]` with the metric value on y.
pub fn violin_outline(density: &[(f64, f64)], centre: f64, half_width: f64) -> Vec<[f64; 2]> {
    let peak = density.iter().map(|&(_, d)| d).fold(0.0, f64::max);
    if peak <= 0.0 {
        return Vec::new();
    }
    let scale = half_width / peak;

    let right = density.iter().map(|&(y, d)| [centre + d * scale, y]);
    let left = density.iter().rev().map(|&(y, d)| [centre - d * scale, y]);
    right.chain(left).collect()
}
