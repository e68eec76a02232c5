//! Configuration file readers and format dispatch
//!
//! A config file holds a partial override document. Readers turn the file into
//! a JSON value; the registry picks a reader from the file extension.

use std::fs;
use std::path::Path;

use particlefield_core::{Config, ConfigError};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while loading a configuration file
#[derive(Error, Debug)]
pub enum IoError {
    /// The file format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The file extension could not be determined
    #[error("could not determine file format from path: {0}")]
    UnknownExtension(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parsing error occurred
    #[error("parse error: {0}")]
    Parse(String),

    /// The document parsed but does not resolve to a configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for reader operations
pub type IoResult<T> = Result<T, IoError>;

/// A reader parses one file format into an override document
pub trait ConfigReader {
    /// Parse file contents; blank input means "no override"
    fn parse(&self, text: &str) -> IoResult<Value>;

    /// File extensions this reader can handle (e.g., ["yaml", "yml"])
    fn supported_extensions(&self) -> &[&str];

    /// Check if this reader can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Read and parse a file
    fn read(&self, input: &Path) -> IoResult<Value> {
        let content = fs::read_to_string(input)?;
        self.parse(&content)
    }
}

/// Reader for JSON override documents
pub struct JsonReader;

impl ConfigReader for JsonReader {
    fn parse(&self, text: &str) -> IoResult<Value> {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(text).map_err(|e| IoError::Parse(e.to_string()))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}

/// Reader for YAML override documents
pub struct YamlReader;

impl ConfigReader for YamlReader {
    fn parse(&self, text: &str) -> IoResult<Value> {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_yaml::from_str(text).map_err(|e| IoError::Parse(e.to_string()))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Registry of available config readers
pub struct ReaderRegistry {
    readers: Vec<Box<dyn ConfigReader>>,
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ReaderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
        }
    }

    /// Create a registry with the JSON and YAML readers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(JsonReader));
        registry.register(Box::new(YamlReader));
        registry
    }

    pub fn register(&mut self, reader: Box<dyn ConfigReader>) {
        self.readers.push(reader);
    }

    /// Find a reader for the given file extension
    pub fn reader_for_extension(&self, ext: &str) -> Option<&dyn ConfigReader> {
        self.readers
            .iter()
            .find(|r| r.supports_extension(ext))
            .map(|r| r.as_ref())
    }

    /// Find a reader for the given path based on its extension
    pub fn reader_for_path(&self, path: &Path) -> IoResult<&dyn ConfigReader> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| IoError::UnknownExtension(path.display().to_string()))?;

        self.reader_for_extension(ext)
            .ok_or_else(|| IoError::UnsupportedFormat(ext.to_string()))
    }

    /// Read a config file and resolve it against the defaults
    pub fn load(&self, path: &Path) -> IoResult<Config> {
        let overrides = self.reader_for_path(path)?.read(path)?;
        tracing::debug!(path = %path.display(), "resolving configuration");
        Ok(Config::resolve(Some(&overrides))?)
    }
}

/// Load a config file with the default readers
///
/// `None` resolves the built-in defaults.
pub fn load_config(path: Option<&Path>) -> IoResult<Config> {
    match path {
        Some(path) => ReaderRegistry::with_defaults().load(path),
        None => Ok(Config::resolve(None)?),
    }
}
