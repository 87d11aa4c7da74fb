use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

use crate::errors::FetchError;

pub fn get_filename_from_url(url_str: &str) -> Result<String> {
    let url = Url::parse(url_str).with_context(|| format!("invalid URL: {}", url_str))?;

    if let Some(segments) = url.path_segments() {
        if let Some(filename) = segments.last() {
            if !filename.is_empty() {
                return Ok(filename.to_string());
            }
        }
    }

    Err(FetchError::NoFilenameInUrl(url_str.to_string()).into())
}

/// Everything after the first `.` in the filename, so `model.tar.gz`
/// yields `tar.gz`, not `gz`.
pub fn derive_extension(filename: &str) -> Result<String> {
    match filename.split_once('.') {
        Some((_, ext)) if !ext.is_empty() => Ok(ext.to_string()),
        _ => Err(FetchError::NoExtension(filename.to_string()).into()),
    }
}

/// Default cache root: `<home>/.cache/mdl/models/`.
pub fn default_cache_dir() -> Result<PathBuf> {
    let base = directories::BaseDirs::new().context("cannot locate home directory")?;
    Ok(base.home_dir().join(".cache").join("mdl").join("models"))
}
