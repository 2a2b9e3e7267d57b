use crate::config::{BlobKind, DatasetConfig};
use log::{debug, warn};
use std::fs;

/// The four compressed files, exactly as fetched or read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlobs {
    pub train_images: Vec<u8>,
    pub train_labels: Vec<u8>,
    pub test_images: Vec<u8>,
    pub test_labels: Vec<u8>,
}

impl RawBlobs {
    /// Build the blobs one kind at a time, in `BlobKind::ALL` order,
    /// stopping at the first failure
    pub fn try_from_fn<E, F>(mut f: F) -> Result<RawBlobs, E>
    where
        F: FnMut(BlobKind) -> Result<Vec<u8>, E>,
    {
        Ok(RawBlobs {
            train_images: f(BlobKind::TrainImages)?,
            train_labels: f(BlobKind::TrainLabels)?,
            test_images: f(BlobKind::TestImages)?,
            test_labels: f(BlobKind::TestLabels)?,
        })
    }

    pub fn get(&self, kind: BlobKind) -> &[u8] {
        match kind {
            BlobKind::TrainImages => &self.train_images,
            BlobKind::TrainLabels => &self.train_labels,
            BlobKind::TestImages => &self.test_images,
            BlobKind::TestLabels => &self.test_labels,
        }
    }
}

/// Read the four cached files from the root directory.
/// Returns None, after telling the user to download first,
/// if any of them is missing or unreadable
pub fn load_cached(config: &DatasetConfig) -> Option<RawBlobs> {
    let blobs = RawBlobs::try_from_fn(|kind| {
        let path = config.path_of(kind);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!("read {} bytes from {}", bytes.len(), path.display());
                Ok(bytes)
            }
            Err(e) => Err((path, e)),
        }
    });

    match blobs {
        Ok(blobs) => Some(blobs),
        Err((path, e)) => {
            warn!("could not read {}: {}", path.display(), e);
            println!("Data is not downloaded.. Please rerun with download enabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_all(config: &DatasetConfig) {
        for kind in BlobKind::ALL {
            fs::write(config.path_of(kind), kind.filename()).unwrap();
        }
    }

    #[test]
    fn reads_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig::new(dir.path());
        write_all(&config);

        let blobs = load_cached(&config).unwrap();

        for kind in BlobKind::ALL {
            assert_eq!(blobs.get(kind), kind.filename().as_bytes());
        }
    }

    #[test]
    fn one_missing_file_means_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig::new(dir.path());
        write_all(&config);
        fs::remove_file(config.path_of(BlobKind::TestLabels)).unwrap();

        assert!(load_cached(&config).is_none());
    }

    #[test]
    fn missing_root_means_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatasetConfig::new(dir.path().join("never-created"));

        assert!(load_cached(&config).is_none());
        assert!(!config.root.exists());
    }

    #[test]
    fn blobs_are_built_in_order() {
        let mut seen = Vec::new();
        let blobs: Result<RawBlobs, ()> = RawBlobs::try_from_fn(|kind| {
            seen.push(kind);
            Ok(vec![seen.len() as u8])
        });

        assert_eq!(seen, BlobKind::ALL.to_vec());
        assert_eq!(blobs.unwrap().test_labels, vec![4]);
    }
}
