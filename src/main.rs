mod commands;
mod downloader;
mod errors;
mod extract;
mod fetcher;
mod registry;
#[cfg(test)]
mod testutil;
mod utils;

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::registry::ModelRegistry;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Model name to resolve (or a direct path to a .ckpt file)
    #[arg(index = 1)]
    model: Option<String>,

    /// Directory used as the local model cache (defaults to ~/.cache/mdl/models)
    #[arg(short = 'd', long = "cache-dir")]
    cache_dir: Option<PathBuf>,

    /// JSON file with a {"model": "https://..."} table replacing the builtin registry
    #[arg(short = 'R', long = "registry")]
    registry: Option<PathBuf>,

    /// List the models known to the registry and exit
    #[arg(short = 'l', long)]
    list: bool,

    /// Download a raw URL instead of resolving a model name
    #[arg(short = 'u', long)]
    url: Option<String>,

    /// Filename to save as (with --url; derived from the URL by default)
    #[arg(long)]
    filename: Option<String>,

    /// Archive extension override, e.g. "tar.gz" (with --url)
    #[arg(short = 'e', long)]
    extension: Option<String>,

    /// Marker file(s), relative to the cache dir, whose existence proves the
    /// download succeeded; if all exist beforehand the download is skipped
    #[arg(short = 'c', long = "check-file", value_name = "PATH")]
    check_files: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let registry = match &args.registry {
        Some(path) => ModelRegistry::from_json_file(path)?,
        None => ModelRegistry::builtin(),
    };

    if args.list {
        commands::run_list(&registry);
        return Ok(());
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        if let Some(url) = args.url {
            commands::run_download(
                url,
                args.cache_dir,
                args.filename,
                args.extension,
                args.check_files,
            )
            .await
        } else if let Some(model) = args.model {
            commands::run_resolve(&registry, &model, args.cache_dir).await
        } else {
            bail!("nothing to do: pass a model name, --url, or --list (see --help)")
        }
    })
}
