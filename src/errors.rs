use std::path::PathBuf;

use thiserror::Error;

/// Failures specific to the fetch workflow. Transport and filesystem
/// errors are not represented here; they propagate as plain I/O errors.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("model `{0}` is not in the registry and is not an existing checkpoint path")]
    UnknownModel(String),

    #[error("registry entry for `{model}` is not an https:// URL: {value}")]
    InvalidRegistryEntry { model: String, value: String },

    #[error("download verification failed, missing files: {0:?}")]
    DownloadVerification(Vec<PathBuf>),

    #[error("no .ckpt file found in {}", .0.display())]
    NoCheckpointFound(PathBuf),

    #[error("cannot derive a filename from URL `{0}`")]
    NoFilenameInUrl(String),

    #[error("cannot derive an archive extension from `{0}`")]
    NoExtension(String),

    #[error("tar exited with {status} while extracting {}", .archive.display())]
    TarFailed {
        status: std::process::ExitStatus,
        archive: PathBuf,
    },
}
