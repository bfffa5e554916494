use ndarray::ArrayView1;

use crate::error::{ensure_dim, Error, Result};

/// Counts indexed as `counts[truth][predicted]`, class 0 first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn get(&self, truth: usize, predicted: usize) -> usize {
        self.counts[truth][predicted]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Class 0 is treated as the positive class.
    pub fn true_positives(&self) -> usize {
        self.counts[0][0]
    }

    pub fn false_positives(&self) -> usize {
        self.counts[0][1]
    }

    pub fn false_negatives(&self) -> usize {
        self.counts[1][0]
    }

    pub fn true_negatives(&self) -> usize {
        self.counts[1][1]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

pub fn confusion_matrix(
    truth: ArrayView1<u8>,
    predicted: ArrayView1<u8>,
) -> Result<ConfusionMatrix> {
    ensure_dim("confusion matrix", truth.len(), predicted.len())?;

    let mut matrix = ConfusionMatrix::default();
    for (&t, &p) in truth.iter().zip(predicted.iter()) {
        let row = class_index(t)?;
        let col = class_index(p)?;
        matrix.counts[row][col] += 1;
    }

    Ok(matrix)
}

/// Accuracy, precision, recall and F1 from [`confusion_matrix`].
///
/// A zero denominator in any metric fails with [`Error::UndefinedMetric`].
pub fn evaluate(truth: ArrayView1<u8>, predicted: ArrayView1<u8>) -> Result<Metrics> {
    let matrix = confusion_matrix(truth, predicted)?;

    let tp = matrix.true_positives() as f64;
    let fp = matrix.false_positives() as f64;
    let fn_ = matrix.false_negatives() as f64;
    let tn = matrix.true_negatives() as f64;

    let accuracy = ratio("accuracy", tp + tn, tp + tn + fp + fn_)?;
    let precision = ratio("precision", tp, tp + fp)?;
    let recall = ratio("recall", tp, tp + fn_)?;
    let f1 = 2.0 * ratio("f1", precision * recall, precision + recall)?;

    Ok(Metrics {
        accuracy,
        precision,
        recall,
        f1,
    })
}

fn ratio(metric: &'static str, numerator: f64, denominator: f64) -> Result<f64> {
    #[allow(clippy::float_cmp)]
    if denominator == 0.0 {
        return Err(Error::UndefinedMetric { metric });
    }

    Ok(numerator / denominator)
}

fn class_index(label: u8) -> Result<usize> {
    match label {
        0 | 1 => Ok(usize::from(label)),
        other => Err(Error::InvalidLabel {
            value: f64::from(other),
        }),
    }
}
