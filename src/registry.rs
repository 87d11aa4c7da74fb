use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Read-only model name -> download URL table. Built once and passed by
/// reference into the fetch path; nothing in the workflow mutates it.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    entries: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile(HashMap<String, String>);

impl ModelRegistry {
    /// Models bundled with the tool. Overridable with `--registry`.
    pub fn builtin() -> Self {
        let entries = [
            (
                "wmt20-qe-da",
                "https://models.example-mirror.net/mdl/share/wmt20-qe-da.tar.gz",
            ),
            (
                "wmt21-seg-mqm",
                "https://models.example-mirror.net/mdl/share/wmt21-seg-mqm.tar.gz",
            ),
            (
                "eamt22-mini-da",
                "https://models.example-mirror.net/mdl/share/eamt22-mini-da.zip",
            ),
        ]
        .into_iter()
        .map(|(name, url)| (name.to_string(), url.to_string()))
        .collect();
        Self { entries }
    }

    pub fn from_map(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Loads a `{"model-name": "https://..."}` JSON object.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read registry file: {}", path.display()))?;
        let file: RegistryFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse registry file: {}", path.display()))?;
        Ok(Self { entries: file.0 })
    }

    pub fn get(&self, model: &str) -> Option<&str> {
        self.entries.get(model).map(String::as_str)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
