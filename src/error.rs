use crate::config::BlobKind;
use std::io;
use std::path::PathBuf;

/// Errors that can occur while fetching, reading or decoding the dataset
#[derive(Debug, thiserror::Error)]
pub enum MnistError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decompress {kind}: {source}")]
    Decompress {
        kind: BlobKind,
        #[source]
        source: io::Error,
    },

    #[error("{kind} holds {len} bytes, less than its {header_size} byte header")]
    Truncated {
        kind: BlobKind,
        len: usize,
        header_size: usize,
    },

    #[error("{kind} payload of {len} bytes is not a multiple of {stride}")]
    Misaligned {
        kind: BlobKind,
        len: usize,
        stride: usize,
    },

    #[error("{kind} has magic number {found:#010x}, expected {expected:#010x}")]
    BadMagic {
        kind: BlobKind,
        found: u32,
        expected: u32,
    },

    #[error("{kind} header declares {declared} items but the payload holds {actual}")]
    CountMismatch {
        kind: BlobKind,
        declared: usize,
        actual: usize,
    },

    #[error("{kind} header declares {rows}x{cols} images")]
    BadDimensions { kind: BlobKind, rows: usize, cols: usize },

    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("{images} images but {labels} labels")]
    LengthMismatch { images: usize, labels: usize },

    #[error("label {label} at index {index} is not a digit")]
    InvalidLabel { index: usize, label: u8 },

    #[error("invalid config {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
