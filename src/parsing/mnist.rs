use super::{idx, Dataset};
use crate::cache::RawBlobs;
use crate::config::{BlobKind, DatasetConfig, IMAGE_SIZE};
use crate::error::MnistError;
use log::debug;
use ndarray::{Array, Array1, Array3, ArrayView, Axis};

pub const NUM_CLASSES: usize = 10;
const GREYSCALE_SIZE: f64 = 255f64;

/// The decoded dataset: images are (n, 28, 28), labels are (n)
#[derive(Debug, Clone)]
pub struct Mnist {
    pub train_images: Array3<u8>,
    pub train_labels: Array1<u8>,
    pub test_images: Array3<u8>,
    pub test_labels: Array1<u8>,
}

impl Mnist {
    /// Decompress and decode all four blobs
    pub fn decode(raw: &RawBlobs, config: &DatasetConfig) -> Result<Mnist, MnistError> {
        Ok(Mnist {
            train_images: decode_images(raw, config, BlobKind::TrainImages)?,
            train_labels: decode_labels(raw, config, BlobKind::TrainLabels)?,
            test_images: decode_images(raw, config, BlobKind::TestImages)?,
            test_labels: decode_labels(raw, config, BlobKind::TestLabels)?,
        })
    }

    /// Train images, train labels, test images, test labels
    pub fn into_tuple(self) -> (Array3<u8>, Array1<u8>, Array3<u8>, Array1<u8>) {
        (
            self.train_images,
            self.train_labels,
            self.test_images,
            self.test_labels,
        )
    }

    pub fn train_dataset(&self) -> Result<Dataset, MnistError> {
        to_dataset(&self.train_images, &self.train_labels)
    }

    pub fn test_dataset(&self) -> Result<Dataset, MnistError> {
        to_dataset(&self.test_images, &self.test_labels)
    }
}

fn decode_images(
    raw: &RawBlobs,
    config: &DatasetConfig,
    kind: BlobKind,
) -> Result<Array3<u8>, MnistError> {
    let data = idx::decompress(kind, raw.get(kind))?;
    let images = idx::decode_images(kind, &data, config.blob(kind).header_size)?;
    let count = images.len_of(Axis(0));

    if config.strict_headers {
        idx::check_header(kind, &data, count)?;
    }

    debug!("decoded {} images from {}", count, kind);
    Ok(images)
}

fn decode_labels(
    raw: &RawBlobs,
    config: &DatasetConfig,
    kind: BlobKind,
) -> Result<Array1<u8>, MnistError> {
    let data = idx::decompress(kind, raw.get(kind))?;
    let labels = idx::decode_labels(kind, &data, config.blob(kind).header_size)?;

    if config.strict_headers {
        idx::check_header(kind, &data, labels.len())?;
    }

    debug!("decoded {} labels from {}", labels.len(), kind);
    Ok(labels)
}

/// Flatten the images into normalized feature rows and
/// one-hot encode the labels
pub fn to_dataset(images: &Array3<u8>, labels: &Array1<u8>) -> Result<Dataset, MnistError> {
    let count = images.len_of(Axis(0));
    if count != labels.len() {
        return Err(MnistError::LengthMismatch {
            images: count,
            labels: labels.len(),
        });
    }

    let mut data = Array::zeros((0, IMAGE_SIZE));
    let mut target = Array::zeros((0, NUM_CLASSES));

    for (index, (image, &label)) in images.axis_iter(Axis(0)).zip(labels.iter()).enumerate() {
        let label_idx = label as usize;
        if label_idx >= NUM_CLASSES {
            return Err(MnistError::InvalidLabel { index, label });
        }

        // we divide by 255 to normalize
        let pixels: Vec<f64> = image.iter().map(|&x| x as f64 / GREYSCALE_SIZE).collect();
        let one_hot_target: Vec<f64> = (0..NUM_CLASSES)
            .map(|idx| if idx == label_idx { 1f64 } else { 0f64 })
            .collect();

        data.push_row(ArrayView::from(&pixels))?;
        target.push_row(ArrayView::from(&one_hot_target))?;
    }

    Ok(Dataset { data, target })
}
