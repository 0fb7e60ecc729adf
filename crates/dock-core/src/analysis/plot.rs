use super::error::AnalysisError;
use plotters::prelude::*;
use plotters_svg::SVGBackend;
use std::f64::consts::PI;
use std::fmt::Display;
use std::path::Path;

const KDE_SAMPLES: usize = 200;

fn plot_err(e: impl Display) -> AnalysisError {
    AnalysisError::Plot(e.to_string())
}

/// Equal-width histogram over `[lo, hi]` with counts per bin.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Histogram {
    pub lo: f64,
    pub hi: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        (self.hi - self.lo) / self.counts.len() as f64
    }
}

/// Sturges' rule: `ceil(log2(n)) + 1` bins.
pub(crate) fn sturges_bins(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    (n as f64).log2().ceil() as usize + 1
}

/// Bins `values` (non-empty) with Sturges' rule. A degenerate range is widened by half a
/// unit on each side so every value still lands in a bin.
pub(crate) fn histogram(values: &[f64]) -> Histogram {
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let bins = sturges_bins(values.len());
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Histogram { lo, hi, counts }
}

/// Scott's rule bandwidth `sigma * n^(-1/5)` using the sample standard deviation.
pub(crate) fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let h = var.sqrt() * (n as f64).powf(-0.2);
    (h > 0.0).then_some(h)
}

/// Gaussian kernel density estimate of `values` at `x`.
pub(crate) fn gaussian_kde(values: &[f64], bandwidth: f64, x: f64) -> f64 {
    let norm = 1.0 / ((2.0 * PI).sqrt() * bandwidth * values.len() as f64);
    values
        .iter()
        .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
        .sum::<f64>()
        * norm
}

/// Renders the score distribution as an SVG histogram with a KDE curve scaled to counts.
pub(crate) fn render_distribution(values: &[f64], path: &Path) -> Result<(), AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyTable);
    }

    let hist = histogram(values);
    let width = hist.bin_width();
    // The curve is scaled by n * bin width so its area matches the bars.
    let curve: Option<Vec<(f64, f64)>> = scott_bandwidth(values).map(|h| {
        let scale = values.len() as f64 * width;
        (0..=KDE_SAMPLES)
            .map(|i| {
                let x = hist.lo + (hist.hi - hist.lo) * i as f64 / KDE_SAMPLES as f64;
                (x, gaussian_kde(values, h, x) * scale)
            })
            .collect()
    });

    let max_count = hist.counts.iter().copied().max().unwrap_or(1) as f64;
    let max_curve = curve
        .iter()
        .flatten()
        .fold(0.0f64, |acc, &(_, y)| acc.max(y));
    let y_max = max_count.max(max_curve) * 1.1;

    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Docking Scores", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(hist.lo..hist.hi, 0f64..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Binding Affinity (kcal/mol)")
        .y_desc("Frequency")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(hist.counts.iter().enumerate().map(|(i, &count)| {
            let x0 = hist.lo + i as f64 * width;
            Rectangle::new([(x0, 0.0), (x0 + width, count as f64)], BLUE.mix(0.6).filled())
        }))
        .map_err(plot_err)?;

    if let Some(points) = curve {
        chart
            .draw_series(LineSeries::new(points, RED.stroke_width(2)))
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}
