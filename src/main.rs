use clap::Parser;
use log::error;
use mnist_cache::config::DEFAULT_ROOT;
use mnist_cache::export::{write_csv, write_summary};
use mnist_cache::{load, DatasetConfig, Mnist, MnistError};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory the dataset files are cached in
    /// Defaults to ./data/ unless the config file says otherwise
    #[arg(short, long, default_value = None)]
    root: Option<PathBuf>,

    /// Fetch the dataset before decoding it
    /// Without this flag the cached files are reused
    #[arg(short, long)]
    download: bool,

    /// JSON file overriding URLs, filenames and header sizes
    #[arg(short, long, default_value = None)]
    config: Option<PathBuf>,

    /// Mirror to download from, e.g. https://ossci-datasets.s3.amazonaws.com/mnist/
    #[arg(short, long, default_value = None)]
    base_url: Option<String>,

    /// Validate IDX magic numbers and dimensions
    #[arg(short, long)]
    strict: bool,

    /// Give up on a download after this many seconds
    #[arg(long, default_value = None)]
    timeout_secs: Option<u64>,

    /// Write the array shapes and label counts in JSON format
    #[arg(short = 'j', long, default_value = None)]
    summary_path: Option<PathBuf>,

    /// Export train.csv and test.csv (label followed by 784 pixels) to this directory
    #[arg(short = 'e', long, default_value = None)]
    csv_dir: Option<PathBuf>,
}

/// Merge the config file, if any, with the command line flags
fn build_config(args: &Args) -> Result<DatasetConfig, MnistError> {
    let mut config = match &args.config {
        Some(path) => DatasetConfig::from_path(path)?,
        None => DatasetConfig::new(DEFAULT_ROOT),
    };

    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url);
    }
    if args.strict {
        config.strict_headers = true;
    }
    if args.timeout_secs.is_some() {
        config.timeout_secs = args.timeout_secs;
    }

    Ok(config)
}

fn export_csv(csv_dir: &Path, mnist: &Mnist) -> Result<(), MnistError> {
    std::fs::create_dir_all(csv_dir).map_err(|source| MnistError::Io {
        path: csv_dir.to_path_buf(),
        source,
    })?;

    write_csv(&csv_dir.join("train.csv"), &mnist.train_images, &mnist.train_labels)?;
    write_csv(&csv_dir.join("test.csv"), &mnist.test_images, &mnist.test_labels)?;

    Ok(())
}

fn run(args: Args) -> Result<bool, MnistError> {
    let config = build_config(&args)?;

    let mnist = match load(&config, args.download)? {
        Some(mnist) => mnist,
        None => return Ok(false),
    };

    println!("train images: {:?}", mnist.train_images.shape());
    println!("train labels: {:?}", mnist.train_labels.shape());
    println!("test images:  {:?}", mnist.test_images.shape());
    println!("test labels:  {:?}", mnist.test_labels.shape());

    if let Some(summary_path) = &args.summary_path {
        write_summary(summary_path, &mnist)?;
    }

    if let Some(csv_dir) = &args.csv_dir {
        export_csv(csv_dir, &mnist)?;
    }

    Ok(true)
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
