use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::downloader::Downloader;
use crate::errors::FetchError;
use crate::registry::ModelRegistry;

const CHECKPOINT_SUFFIX: &str = ".ckpt";

/// Resolves a model name to the path of its checkpoint file, downloading
/// and unpacking the artifact on a cache miss. Calling this twice for the
/// same model hits the cache the second time and touches no network.
pub async fn resolve_model(
    registry: &ModelRegistry,
    downloader: &Downloader,
    model: &str,
    save_directory: Option<PathBuf>,
) -> Result<PathBuf> {
    let save_directory = match save_directory {
        Some(dir) => dir,
        None => crate::utils::default_cache_dir()?,
    };
    fs::create_dir_all(&save_directory)
        .await
        .with_context(|| format!("failed to create cache directory: {}", save_directory.display()))?;

    let model_dir = save_directory.join(model);
    if !model_dir.is_dir() {
        return match registry.get(model) {
            None => {
                // A name absent from the registry may still be a direct
                // path to a checkpoint file the caller already has.
                let candidate = Path::new(model);
                if candidate.is_file() {
                    return Ok(candidate.to_path_buf());
                }
                Err(FetchError::UnknownModel(model.to_string()).into())
            }
            Some(url) if !url.starts_with("https://") => Err(FetchError::InvalidRegistryEntry {
                model: model.to_string(),
                value: url.to_string(),
            }
            .into()),
            Some(url) => install_model(downloader, url, model, &save_directory).await,
        };
    }

    eprintln!("{} is already in cache.", model);
    remove_leftover_archives(model, &save_directory).await;
    select_checkpoint(&model_dir.join("checkpoints")).await
}

/// Cache-miss path: download and unpack the artifact, drop the archive,
/// resolve the freshly installed checkpoint.
async fn install_model(
    downloader: &Downloader,
    url: &str,
    model: &str,
    save_directory: &Path,
) -> Result<PathBuf> {
    downloader
        .download_and_extract(url, save_directory, None, None, &[])
        .await?;
    remove_leftover_archives(model, save_directory).await;
    select_checkpoint(&save_directory.join(model).join("checkpoints")).await
}

/// Leftover archives from this run or an earlier interrupted one.
/// Best-effort; a missing file is the normal case.
async fn remove_leftover_archives(model: &str, save_directory: &Path) {
    for suffix in ["zip", "tar.gz", "tar"] {
        let leftover = save_directory.join(format!("{}.{}", model, suffix));
        let _ = fs::remove_file(&leftover).await;
    }
}

/// Last `.ckpt` name in ascending sort order. The ordering is
/// lexicographic, not chronological.
async fn select_checkpoint(checkpoints_dir: &Path) -> Result<PathBuf> {
    let mut entries = fs::read_dir(checkpoints_dir)
        .await
        .with_context(|| format!("failed to list {}", checkpoints_dir.display()))?;

    let mut checkpoints: Vec<String> = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .context("failed to read directory entry")?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(CHECKPOINT_SUFFIX) {
            checkpoints.push(name);
        }
    }

    checkpoints.sort_unstable();
    match checkpoints.pop() {
        Some(name) => Ok(checkpoints_dir.join(name)),
        None => Err(FetchError::NoCheckpointFound(checkpoints_dir.to_path_buf()).into()),
    }
}
