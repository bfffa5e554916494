use std::fs;
use std::path::Path;

use plotters::prelude::*;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::evaluate::ConfusionMatrix;
use crate::model::TrainingHistory;

const LINE_CHART_SIZE: (u32, u32) = (800, 600);
const HEATMAP_SIZE: (u32, u32) = (700, 560);

pub const LOSS_CHART: &str = "epochs_vs_loss.png";
pub const ACTIVATION_CHART: &str = "epochs_vs_activation_value.png";

/// Writes the loss and mean-activation curves of `history` into `dir`.
pub fn plot_history<P: AsRef<Path>>(history: &TrainingHistory, dir: P) -> Result<()> {
    if history.is_empty() {
        warn!("training history is empty, skipping charts");
        return Ok(());
    }

    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let loss: Vec<(f64, f64)> = history
        .entries()
        .iter()
        .map(|entry| (entry.epoch as f64, entry.cost))
        .collect();
    let activation: Vec<(f64, f64)> = history
        .entries()
        .iter()
        .map(|entry| (entry.epoch as f64, entry.mean_activation))
        .collect();

    line_chart(&dir.join(LOSS_CHART), "epochs", "Loss", &loss)?;
    line_chart(&dir.join(ACTIVATION_CHART), "epochs", "activation_value", &activation)?;

    info!(dir = %dir.display(), "wrote training charts");
    Ok(())
}

/// Renders `matrix` as an annotated heatmap, truth on rows and predictions on
/// columns, class 0 first.
pub fn plot_confusion_matrix<P: AsRef<Path>>(
    matrix: &ConfusionMatrix,
    classes: &[String],
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let caption = if classes.is_empty() {
        "Confusion matrix".to_string()
    } else {
        format!("Confusion matrix ({})", classes.join(" | "))
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0f64..2f64, 0f64..2f64)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .y_labels(0)
        .x_desc("Predicted")
        .y_desc("Truth")
        .draw()
        .map_err(plot_error)?;

    let peak = matrix.counts.iter().flatten().copied().max().unwrap_or(0).max(1) as f64;
    let cells: Vec<(f64, f64, usize)> = (0..2)
        .flat_map(|truth| (0..2).map(move |predicted| (truth, predicted)))
        .map(|(truth, predicted)| {
            // truth row 0 is drawn at the top
            (
                predicted as f64,
                1.0 - truth as f64,
                matrix.get(truth, predicted),
            )
        })
        .collect();

    chart
        .draw_series(cells.iter().map(|&(x, y, count)| {
            let shade = 0.1 + 0.8 * (count as f64 / peak);
            Rectangle::new([(x, y), (x + 1.0, y + 1.0)], BLUE.mix(shade).filled())
        }))
        .map_err(plot_error)?;

    chart
        .draw_series(cells.iter().map(|&(x, y, count)| {
            Text::new(
                count.to_string(),
                (x + 0.45, y + 0.55),
                ("sans-serif", 32).into_font(),
            )
        }))
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;

    info!(path = %path.display(), "wrote confusion matrix heatmap");
    Ok(())
}

fn line_chart(path: &Path, x_desc: &str, y_desc: &str, points: &[(f64, f64)]) -> Result<()> {
    let finite: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if finite.is_empty() {
        warn!(path = %path.display(), "no finite points to plot");
        return Ok(());
    }

    let (x_min, x_max) = padded_range(finite.iter().map(|&(x, _)| x));
    let (y_min, y_max) = padded_range(finite.iter().map(|&(_, y)| y));

    let root = BitMapBackend::new(path, LINE_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(finite, &BLUE))
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if max - min < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

fn plot_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Plot(err.to_string())
}
