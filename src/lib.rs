//! Fetch, cache and decode the MNIST handwritten digit dataset.
//!
//! The four gzip-compressed IDX files are downloaded once into a root
//! directory and decoded from there on later runs:
//!
//! ```no_run
//! use mnist_cache::{load, DatasetConfig};
//!
//! let config = DatasetConfig::new("./data/");
//! if let Some(mnist) = load(&config, true).unwrap() {
//!     let (train_images, train_labels, _, _) = mnist.into_tuple();
//!     let (count, rows, cols) = train_images.dim();
//!     assert_eq!((rows, cols), (28, 28));
//!     assert_eq!(count, train_labels.len());
//! }
//! ```
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod parsing;

pub use cache::{load_cached, RawBlobs};
pub use config::{BlobKind, BlobSpec, DatasetConfig};
pub use error::MnistError;
pub use fetch::{fetch_and_cache, Fetcher, HttpFetcher};
pub use parsing::mnist::Mnist;
pub use parsing::Dataset;

/// Materialize the dataset over HTTP, or from the cache when `download` is false.
///
/// Returns `Ok(None)` when reusing the cache and a file is missing; run again
/// with `download` set in that case.
pub fn load(config: &DatasetConfig, download: bool) -> Result<Option<Mnist>, MnistError> {
    if download {
        let fetcher = HttpFetcher::from_config(config)?;
        load_with(config, true, &fetcher)
    } else {
        load_cached(config)
            .map(|raw| Mnist::decode(&raw, config))
            .transpose()
    }
}

/// Same as [`load`], fetching through `fetcher` instead of HTTP
pub fn load_with<F: Fetcher>(
    config: &DatasetConfig,
    download: bool,
    fetcher: &F,
) -> Result<Option<Mnist>, MnistError> {
    let raw = if download {
        fetch_and_cache(config, fetcher)?
    } else {
        match load_cached(config) {
            Some(raw) => raw,
            None => return Ok(None),
        }
    };

    Mnist::decode(&raw, config).map(Some)
}
