use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayView4};
use tracing::info;

use crate::error::{ensure_dim, Error, Result};

const PIXEL_MAX: f64 = 255.0;

/// One labelled split, already flattened to (features, samples).
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub features: Array2<f64>,
    pub labels: Array1<f64>,
}

impl Split {
    pub fn feature_count(&self) -> usize {
        self.features.nrows()
    }

    pub fn sample_count(&self) -> usize {
        self.features.ncols()
    }
}

/// Reshapes an image batch (N, H, W, C) to (H·W·C, N) scaled into [0, 1].
pub fn flatten(images: ArrayView4<u8>) -> Array2<f64> {
    let (n, h, w, c) = images.dim();
    let mut rows = Array2::zeros((n, h * w * c));

    for (mut row, image) in rows.outer_iter_mut().zip(images.outer_iter()) {
        // outer_iter yields images in logical (H, W, C) order
        for (slot, &pixel) in row.iter_mut().zip(image.iter()) {
            *slot = f64::from(pixel);
        }
    }

    normalize_pixels(rows.view())
}

/// Transposes sample rows (N, F) of raw 0..=255 pixels into (F, N) in [0, 1].
pub fn normalize_pixels(rows: ArrayView2<f64>) -> Array2<f64> {
    rows.t().mapv(|pixel| pixel / PIXEL_MAX)
}

/// Converts 0.0/1.0 labels into class codes.
pub fn to_classes(labels: ArrayView1<f64>) -> Result<Array1<u8>> {
    labels
        .iter()
        .copied()
        .map(class_of)
        .collect::<Result<Vec<u8>>>()
        .map(Array1::from_vec)
}

#[allow(clippy::float_cmp)]
fn class_of(value: f64) -> Result<u8> {
    if value == 0.0 {
        Ok(0)
    } else if value == 1.0 {
        Ok(1)
    } else {
        Err(Error::InvalidLabel { value })
    }
}

pub fn load_split<P: AsRef<Path>>(path: P) -> Result<Split> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let split = read_split(BufReader::new(file), &path.display().to_string())?;

    info!(
        path = %path.display(),
        samples = split.sample_count(),
        features = split.feature_count(),
        "loaded split"
    );

    Ok(split)
}

/// Parses `label,pixel_0,...,pixel_{F-1}` records with a header row; the
/// label is always the first field.
pub fn read_split<R: Read>(reader: R, name: &str) -> Result<Split> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut labels = Vec::new();
    let mut pixels = Vec::new();
    let mut feature_count = None;

    for result in reader.records() {
        let record = result?;

        let values = record
            .iter()
            .map(|field| {
                field
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| invalid_field(name, labels.len(), field))
            })
            .collect::<Result<Vec<f64>>>()?;

        let Some((&label, record_pixels)) = values.split_first() else {
            continue;
        };
        let width = record_pixels.len();
        ensure_dim("split record width", *feature_count.get_or_insert(width), width)?;
        class_of(label)?;

        labels.push(label);
        pixels.extend_from_slice(record_pixels);
    }

    let feature_count = feature_count.ok_or_else(|| Error::EmptyDataset(name.to_string()))?;
    let rows = Array2::from_shape_vec((labels.len(), feature_count), pixels)?;

    Ok(Split {
        features: normalize_pixels(rows.view()),
        labels: Array1::from(labels),
    })
}

fn invalid_field(name: &str, record: usize, field: &str) -> Error {
    Error::InvalidField {
        dataset: name.to_string(),
        record,
        field: field.to_string(),
    }
}
