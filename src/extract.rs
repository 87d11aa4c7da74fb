use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::errors::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
    Tar,
}

/// Format dispatch by substring containment, first match wins. The order
/// (zip, then tar.gz/tgz, then tar) is load-bearing: `foo.tar.gz` must not
/// match the plain-tar arm. Containment rather than equality is inherited
/// behavior; see DESIGN.md before "fixing" it.
pub fn detect(extension: &str) -> Option<ArchiveKind> {
    if extension.contains("zip") {
        Some(ArchiveKind::Zip)
    } else if extension.contains("tar.gz") || extension.contains("tgz") {
        Some(ArchiveKind::TarGz)
    } else if extension.contains("tar") {
        Some(ArchiveKind::Tar)
    } else {
        None
    }
}

/// Extracts `archive` into `directory` if its extension names a known
/// format; anything else is left in place untouched.
pub async fn maybe_extract(archive: &Path, directory: &Path, extension: &str) -> Result<()> {
    match detect(extension) {
        Some(ArchiveKind::Zip) => {
            // The zip crate is synchronous; keep it off the async worker.
            let archive = archive.to_path_buf();
            let directory = directory.to_path_buf();
            tokio::task::spawn_blocking(move || extract_zip(&archive, &directory))
                .await
                .context("zip extraction task panicked")?
        }
        Some(ArchiveKind::TarGz) => run_tar(archive, directory, true).await,
        Some(ArchiveKind::Tar) => run_tar(archive, directory, false).await,
        None => Ok(()),
    }
}

fn extract_zip(archive: &Path, directory: &Path) -> Result<()> {
    let file = std::fs::File::open(archive)
        .with_context(|| format!("failed to open archive: {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(file)
        .with_context(|| format!("not a zip archive: {}", archive.display()))?;
    zip.extract(directory)
        .with_context(|| format!("failed to extract {}", archive.display()))?;
    Ok(())
}

// The external tar is noticeably faster than in-process untarring for the
// multi-gigabyte archives the registry points at.
async fn run_tar(archive: &Path, directory: &Path, gzip: bool) -> Result<()> {
    let flags = if gzip { "-zxvf" } else { "-xvf" };
    let status = Command::new("tar")
        .arg("-C")
        .arg(directory)
        .arg(flags)
        .arg(archive)
        .stdout(Stdio::null())
        .status()
        .await
        .context("failed to spawn tar")?;

    if !status.success() {
        return Err(FetchError::TarFailed {
            status,
            archive: archive.to_path_buf(),
        }
        .into());
    }
    Ok(())
}
