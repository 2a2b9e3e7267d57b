use crate::cache::RawBlobs;
use crate::config::DatasetConfig;
use crate::error::MnistError;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use reqwest::blocking::Client;
use std::fs;
use std::time::Duration;

/// Something that can turn a URL into bytes
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, MnistError>;
}

/// Fetches over HTTP(S), following redirects
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<HttpFetcher, MnistError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(MnistError::Client)?;

        Ok(HttpFetcher { client })
    }

    pub fn from_config(config: &DatasetConfig) -> Result<HttpFetcher, MnistError> {
        HttpFetcher::new(config.timeout_secs.map(Duration::from_secs))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, MnistError> {
        let http_err = |source| MnistError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(http_err)?;
        let bytes = response.bytes().map_err(http_err)?;

        Ok(bytes.to_vec())
    }
}

/// Download the four blobs one after the other and write each to the root
/// directory, creating it first. Any failure aborts the whole download
pub fn fetch_and_cache<F: Fetcher>(
    config: &DatasetConfig,
    fetcher: &F,
) -> Result<RawBlobs, MnistError> {
    println!("Downloading dataset..");

    fs::create_dir_all(&config.root).map_err(|source| MnistError::Io {
        path: config.root.clone(),
        source,
    })?;

    let pbar = ProgressBar::new(4);
    pbar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let blobs = RawBlobs::try_from_fn(|kind| {
        let spec = config.blob(kind);
        pbar.set_message(spec.filename.clone());
        info!("fetching {} from {}", kind, spec.url);

        let bytes = fetcher.fetch(&spec.url)?;
        let path = config.path_of(kind);
        fs::write(&path, &bytes).map_err(|source| MnistError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("wrote {} bytes to {}", bytes.len(), path.display());

        pbar.inc(1);
        Ok(bytes)
    });

    match blobs {
        Ok(blobs) => {
            pbar.finish_with_message("done");
            Ok(blobs)
        }
        Err(e) => {
            pbar.abandon();
            Err(e)
        }
    }
}
