use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use futures::StreamExt;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::errors::FetchError;
use crate::extract;
use crate::utils::{derive_extension, get_filename_from_url};

pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent("mdl/0.1.0")
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Downloads `url` into `directory`, unpacking recognized archives in
    /// place. When every path in `check_files` already exists the whole
    /// operation is skipped and no request is made; the returned filepath
    /// is then not guaranteed to exist itself, only the markers are.
    pub async fn download_and_extract(
        &self,
        url: &str,
        directory: &Path,
        filename: Option<String>,
        extension: Option<String>,
        check_files: &[String],
    ) -> Result<PathBuf> {
        let filename = match filename {
            Some(name) => name,
            None => get_filename_from_url(url)?,
        };
        let filepath = directory.join(&filename);
        let markers: Vec<PathBuf> = check_files.iter().map(|f| directory.join(f)).collect();

        if !markers.is_empty() && markers.iter().all(|m| m.exists()) {
            self.print_skip(&filepath, &filename).await;
            return Ok(filepath);
        }

        fs::create_dir_all(directory)
            .await
            .with_context(|| format!("failed to create directory: {}", directory.display()))?;

        self.download_to(url, &filepath, &filename).await?;

        let extension = match extension {
            Some(ext) => ext,
            None => derive_extension(&filename)?,
        };
        extract::maybe_extract(&filepath, directory, &extension).await?;

        let missing: Vec<PathBuf> = markers.iter().filter(|m| !m.exists()).cloned().collect();
        if !missing.is_empty() {
            return Err(FetchError::DownloadVerification(missing).into());
        }

        Ok(filepath)
    }

    async fn download_to(&self, url: &str, filepath: &Path, filename: &str) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request failed: {}", url))?
            .error_for_status()
            .with_context(|| format!("download failed: {}", url))?;

        // 0 renders as an indeterminate bar when the server sends no length
        let total_size = response.content_length().unwrap_or(0);

        let pb = ProgressBar::new(total_size);
        pb.set_style(ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes:>12}/{total_bytes:<12} {bytes_per_sec:>12} {eta:>4} {msg}")
            .unwrap()
            .progress_chars("=>-"));
        pb.set_message(format!("Downloading {}", filename));

        let mut file = File::create(filepath)
            .await
            .with_context(|| format!("failed to create file: {}", filepath.display()))?;

        let mut stream = response.bytes_stream();
        while let Some(item) = stream.next().await {
            let chunk = item.context("error while downloading chunk")?;
            file.write_all(&chunk)
                .await
                .context("error while writing to file")?;
            pb.inc(chunk.len() as u64);
        }

        file.flush().await.context("failed to flush file")?;
        pb.finish_with_message(format!("Completed   {}", filename));
        Ok(())
    }

    async fn print_skip(&self, filepath: &Path, filename: &str) {
        if let Ok(metadata) = fs::metadata(filepath).await {
            let size = HumanBytes(metadata.len());
            let created: Option<DateTime<Local>> = metadata.created().ok().map(Into::into);
            match created {
                Some(date) => eprintln!(
                    "{:>12} {:>17} Skipped {}",
                    format!("{}", size),
                    date.format("%Y-%m-%d %H:%M"),
                    filename
                ),
                None => eprintln!("{:>12} Skipped {}", format!("{}", size), filename),
            }
        } else {
            eprintln!("Skipped {} (markers already present)", filename);
        }
    }
}
