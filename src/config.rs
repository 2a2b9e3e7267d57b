use crate::error::MnistError;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ROOT: &str = "./data/";
pub const DEFAULT_BASE_URL: &str = "http://yann.lecun.com/exdb/mnist/";

pub const IMAGE_ROWS: usize = 28;
pub const IMAGE_COLS: usize = 28;
pub const IMAGE_SIZE: usize = IMAGE_ROWS * IMAGE_COLS;

pub const IMAGE_HEADER_SIZE: usize = 16;
pub const LABEL_HEADER_SIZE: usize = 8;

pub const IMAGE_MAGIC: u32 = 0x0000_0803;
pub const LABEL_MAGIC: u32 = 0x0000_0801;

/// One of the four files that make up the dataset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlobKind {
    TrainImages,
    TrainLabels,
    TestImages,
    TestLabels,
}

impl BlobKind {
    /// Every kind, in the order the dataset is fetched and returned
    pub const ALL: [BlobKind; 4] = [
        BlobKind::TrainImages,
        BlobKind::TrainLabels,
        BlobKind::TestImages,
        BlobKind::TestLabels,
    ];

    pub fn is_images(self) -> bool {
        matches!(self, BlobKind::TrainImages | BlobKind::TestImages)
    }

    /// Size of the IDX header that precedes the samples
    pub fn header_size(self) -> usize {
        if self.is_images() {
            IMAGE_HEADER_SIZE
        } else {
            LABEL_HEADER_SIZE
        }
    }

    /// Number of bytes per decoded item (one image or one label)
    pub fn stride(self) -> usize {
        if self.is_images() {
            IMAGE_SIZE
        } else {
            1
        }
    }

    pub fn magic(self) -> u32 {
        if self.is_images() {
            IMAGE_MAGIC
        } else {
            LABEL_MAGIC
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            BlobKind::TrainImages => "train-images-idx3-ubyte.gz",
            BlobKind::TrainLabels => "train-labels-idx1-ubyte.gz",
            BlobKind::TestImages => "t10k-images-idx3-ubyte.gz",
            BlobKind::TestLabels => "t10k-labels-idx1-ubyte.gz",
        }
    }
}

impl fmt::Display for BlobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlobKind::TrainImages => "train-images",
            BlobKind::TrainLabels => "train-labels",
            BlobKind::TestImages => "test-images",
            BlobKind::TestLabels => "test-labels",
        };
        f.write_str(name)
    }
}

/// Where a blob lives remotely and locally, and how much header to skip
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BlobSpec {
    pub url: String,
    pub filename: String,
    pub header_size: usize,
}

impl BlobSpec {
    fn from_base(base_url: &str, kind: BlobKind) -> BlobSpec {
        BlobSpec {
            url: join_url(base_url, kind.filename()),
            filename: kind.filename().to_string(),
            header_size: kind.header_size(),
        }
    }
}

fn join_url(base: &str, filename: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, filename)
    } else {
        format!("{}/{}", base, filename)
    }
}

/// Everything needed to materialize the dataset.
/// Can be loaded from a JSON file; any field left out keeps its default.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Directory the `.gz` files are cached in
    pub root: PathBuf,
    pub train_images: BlobSpec,
    pub train_labels: BlobSpec,
    pub test_images: BlobSpec,
    pub test_labels: BlobSpec,
    /// Check IDX magic numbers and declared dimensions while decoding
    pub strict_headers: bool,
    /// Per-request timeout for downloads. None waits forever
    pub timeout_secs: Option<u64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            root: PathBuf::from(DEFAULT_ROOT),
            train_images: BlobSpec::from_base(DEFAULT_BASE_URL, BlobKind::TrainImages),
            train_labels: BlobSpec::from_base(DEFAULT_BASE_URL, BlobKind::TrainLabels),
            test_images: BlobSpec::from_base(DEFAULT_BASE_URL, BlobKind::TestImages),
            test_labels: BlobSpec::from_base(DEFAULT_BASE_URL, BlobKind::TestLabels),
            strict_headers: false,
            timeout_secs: None,
        }
    }
}

impl DatasetConfig {
    pub fn new<P: Into<PathBuf>>(root: P) -> DatasetConfig {
        DatasetConfig {
            root: root.into(),
            ..DatasetConfig::default()
        }
    }

    /// Point every blob at a different mirror, keeping the filenames
    pub fn with_base_url(mut self, base_url: &str) -> DatasetConfig {
        for kind in BlobKind::ALL {
            let spec = self.blob_mut(kind);
            spec.url = join_url(base_url, &spec.filename);
        }
        self
    }

    pub fn from_path(path: &Path) -> Result<DatasetConfig, MnistError> {
        let contents = fs::read_to_string(path).map_err(|source| MnistError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| MnistError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn blob(&self, kind: BlobKind) -> &BlobSpec {
        match kind {
            BlobKind::TrainImages => &self.train_images,
            BlobKind::TrainLabels => &self.train_labels,
            BlobKind::TestImages => &self.test_images,
            BlobKind::TestLabels => &self.test_labels,
        }
    }

    fn blob_mut(&mut self, kind: BlobKind) -> &mut BlobSpec {
        match kind {
            BlobKind::TrainImages => &mut self.train_images,
            BlobKind::TrainLabels => &mut self.train_labels,
            BlobKind::TestImages => &mut self.test_images,
            BlobKind::TestLabels => &mut self.test_labels,
        }
    }

    /// Local path of the cached file for `kind`
    pub fn path_of(&self, kind: BlobKind) -> PathBuf {
        self.root.join(&self.blob(kind).filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_points_at_lecun_mirror() {
        let config = DatasetConfig::default();

        assert_eq!(config.root, PathBuf::from("./data/"));
        assert_eq!(
            config.blob(BlobKind::TestLabels).url,
            "http://yann.lecun.com/exdb/mnist/t10k-labels-idx1-ubyte.gz"
        );
        assert_eq!(config.blob(BlobKind::TrainImages).header_size, 16);
        assert_eq!(config.blob(BlobKind::TrainLabels).header_size, 8);
        assert!(!config.strict_headers);
    }

    #[test]
    fn base_url_gets_a_separator() {
        let config = DatasetConfig::new("/tmp/mnist").with_base_url("https://mirror.example/mnist");

        assert_eq!(
            config.blob(BlobKind::TrainImages).url,
            "https://mirror.example/mnist/train-images-idx3-ubyte.gz"
        );
        assert_eq!(
            config.path_of(BlobKind::TrainLabels),
            PathBuf::from("/tmp/mnist/train-labels-idx1-ubyte.gz")
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "root": "cache",
                "strict_headers": true,
                "test_labels": {{
                    "url": "file-server/labels.gz",
                    "filename": "labels.gz",
                    "header_size": 8
                }}
            }}"#
        )
        .unwrap();

        let config = DatasetConfig::from_path(file.path()).unwrap();

        assert_eq!(config.root, PathBuf::from("cache"));
        assert!(config.strict_headers);
        assert_eq!(config.blob(BlobKind::TestLabels).filename, "labels.gz");
        assert_eq!(
            config.blob(BlobKind::TestImages).filename,
            "t10k-images-idx3-ubyte.gz"
        );
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ root: ").unwrap();

        match DatasetConfig::from_path(file.path()) {
            Err(MnistError::Config { .. }) => {}
            other => panic!("expected a config error, got {:?}", other),
        }
    }
}
