use anyhow::Result;
use std::path::PathBuf;

use crate::downloader::Downloader;
use crate::fetcher;
use crate::registry::ModelRegistry;

pub async fn run_resolve(
    registry: &ModelRegistry,
    model: &str,
    cache_dir: Option<PathBuf>,
) -> Result<()> {
    let downloader = Downloader::new();
    let checkpoint = fetcher::resolve_model(registry, &downloader, model, cache_dir).await?;
    println!("{}", checkpoint.display());
    Ok(())
}

pub async fn run_download(
    url: String,
    cache_dir: Option<PathBuf>,
    filename: Option<String>,
    extension: Option<String>,
    check_files: Vec<String>,
) -> Result<()> {
    let directory = match cache_dir {
        Some(dir) => dir,
        None => crate::utils::default_cache_dir()?,
    };

    let downloader = Downloader::new();
    let filepath = downloader
        .download_and_extract(&url, &directory, filename, extension, &check_files)
        .await?;
    println!("{}", filepath.display());
    Ok(())
}

pub fn run_list(registry: &ModelRegistry) {
    for name in registry.names() {
        println!("{}", name);
    }
}
