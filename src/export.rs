use crate::config::{IMAGE_COLS, IMAGE_ROWS};
use crate::error::MnistError;
use crate::parsing::mnist::{Mnist, NUM_CLASSES};
use json::{object, JsonValue};
use ndarray::{Array1, Array3, Axis};
use std::fs::File;
use std::io::Write;
use std::iter;
use std::path::Path;

/// Write an image/label pair as CSV, one sample per line:
/// <label>,<pixel0x0>,<pixel0x1>,...
/// preceded by a `label,1x1,...,28x28` header line
pub fn write_csv(path: &Path, images: &Array3<u8>, labels: &Array1<u8>) -> Result<(), MnistError> {
    let count = images.len_of(Axis(0));
    if count != labels.len() {
        return Err(MnistError::LengthMismatch {
            images: count,
            labels: labels.len(),
        });
    }

    let mut writer = csv::Writer::from_path(path)?;

    let header = (1..=IMAGE_ROWS)
        .flat_map(|row| (1..=IMAGE_COLS).map(move |col| format!("{}x{}", row, col)));
    writer.write_record(iter::once("label".to_string()).chain(header))?;

    for (image, label) in images.axis_iter(Axis(0)).zip(labels.iter()) {
        let pixels = image.iter().map(|x| x.to_string());
        writer.write_record(iter::once(label.to_string()).chain(pixels))?;
    }

    writer.flush().map_err(|source| MnistError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// How many times each digit appears
fn label_counts(labels: &Array1<u8>) -> Vec<usize> {
    let mut counts = vec![0; NUM_CLASSES];

    for &label in labels.iter() {
        if let Some(count) = counts.get_mut(label as usize) {
            *count += 1;
        }
    }

    counts
}

/// Shapes and label distributions of the decoded dataset
pub fn summary(mnist: &Mnist) -> JsonValue {
    let mut data = object! {};

    data["train_images"] = mnist.train_images.shape().to_vec().into();
    data["train_labels"] = mnist.train_labels.shape().to_vec().into();
    data["test_images"] = mnist.test_images.shape().to_vec().into();
    data["test_labels"] = mnist.test_labels.shape().to_vec().into();
    data["train_label_counts"] = label_counts(&mnist.train_labels).into();
    data["test_label_counts"] = label_counts(&mnist.test_labels).into();

    data
}

/// Write the summary in JSON format
pub fn write_summary(path: &Path, mnist: &Mnist) -> Result<(), MnistError> {
    let io_err = |source| MnistError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(summary(mnist).pretty(4).as_bytes()).map_err(io_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_mnist() -> Mnist {
        let mut train_images = Array3::<u8>::zeros((3, 28, 28));
        train_images[[2, 0, 1]] = 200;

        Mnist {
            train_images,
            train_labels: Array1::from(vec![7, 7, 1]),
            test_images: Array3::<u8>::zeros((1, 28, 28)),
            test_labels: Array1::from(vec![0]),
        }
    }

    #[test]
    fn csv_has_label_then_784_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        let mnist = tiny_mnist();

        write_csv(&path, &mnist.train_images, &mnist.train_labels).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 785);
        assert_eq!(&headers[0], "label");
        assert_eq!(&headers[1], "1x1");
        assert_eq!(&headers[784], "28x28");

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][0], "7");
        assert_eq!(&records[2][0], "1");
        assert_eq!(&records[2][2], "200");
    }

    #[test]
    fn csv_needs_matching_lengths() {
        let dir = tempfile::tempdir().unwrap();
        let mnist = tiny_mnist();

        let path = dir.path().join("bad.csv");

        let result = write_csv(&path, &mnist.train_images, &mnist.test_labels);

        assert!(matches!(result, Err(MnistError::LengthMismatch { .. })));
    }

    #[test]
    fn summary_lists_shapes_and_counts() {
        let summary = summary(&tiny_mnist());

        assert_eq!(summary["train_images"], json::array![3, 28, 28]);
        assert_eq!(summary["test_labels"], json::array![1]);
        assert_eq!(summary["train_label_counts"][7].as_usize(), Some(2));
        assert_eq!(summary["train_label_counts"][1].as_usize(), Some(1));
        assert_eq!(summary["train_label_counts"][0].as_usize(), Some(0));
        assert_eq!(summary["test_label_counts"][0].as_usize(), Some(1));
    }

    #[test]
    fn summary_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");

        write_summary(&path, &tiny_mnist()).unwrap();

        let parsed = json::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, summary(&tiny_mnist()));
    }
}
