//! File operations

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::debug;

use crate::errors::ClientError;

/// Serialization format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick the format from the extension of `path`
    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.trim().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            _ => Err(ClientError::UnsupportedFileExtension(
                path.display().to_string(),
            )),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }
}

/// A file wrapper with path
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
}

impl File {
    /// Create a new file reference
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format implied by the file extension
    pub fn format(&self) -> Result<Format, ClientError> {
        Format::from_path(&self.path)
    }

    /// Check if the file exists
    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path).await.is_ok()
    }

    /// Read file contents as string
    pub async fn read_string(&self) -> Result<String, ClientError> {
        Ok(fs::read_to_string(&self.path).await?)
    }

    /// Write string to file, creating parent directories
    pub async fn write_string(&self, contents: &str) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, contents).await?;
        Ok(())
    }

    /// Read file as JSON
    pub async fn read_json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        let contents = self.read_string().await?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Read file as YAML
    pub async fn read_yaml<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        let contents = self.read_string().await?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Write JSON to file
    pub async fn write_json<T: Serialize>(&self, value: &T) -> Result<(), ClientError> {
        let contents = serde_json::to_string_pretty(value)?;
        self.write_string(&contents).await
    }

    /// Write YAML to file
    pub async fn write_yaml<T: Serialize>(&self, value: &T) -> Result<(), ClientError> {
        let contents = serde_yaml::to_string(value)?;
        self.write_string(&contents).await
    }

    /// Read the file in the format given by its extension
    pub async fn read_as<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        let format = self.format()?;
        debug!("Loading {} as {:?}", self.path.display(), format);
        match format {
            Format::Json => self.read_json().await,
            Format::Yaml => self.read_yaml().await,
        }
    }

    /// Write the file in the format given by its extension
    pub async fn write_as<T: Serialize>(&self, value: &T) -> Result<(), ClientError> {
        let format = self.format()?;
        debug!("Dumping {} as {:?}", self.path.display(), format);
        match format {
            Format::Json => self.write_json(value).await,
            Format::Yaml => self.write_yaml(value).await,
        }
    }
}
