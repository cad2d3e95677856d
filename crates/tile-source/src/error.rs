//! Error types for tile sources.

use std::fmt;

use thiserror::Error;

/// Result type alias using SourceError.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors raised while configuring a source or rendering through it.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to allocate {what}")]
    Allocation { what: String },

    // === Configuration Errors ===
    #[error("wms source {source_name} has no url")]
    MissingUrl { source_name: String },

    #[error("wms source {source_name} has no LAYERS")]
    MissingLayers { source_name: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // === Render Errors ===
    #[error("http request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("wms request for tileset {tileset}: {x} {y} {z} returned an unsupported format:\n{body}")]
    UnsupportedFormat {
        tileset: String,
        x: u32,
        y: u32,
        z: u32,
        body: String,
    },
}

impl SourceError {
    /// Category tag reported alongside the message.
    pub fn category(&self) -> &'static str {
        match self {
            SourceError::Allocation { .. } => "AllocError",
            SourceError::MissingUrl { .. }
            | SourceError::MissingLayers { .. }
            | SourceError::UnsupportedFormat { .. } => "SourceWmsError",
            SourceError::InvalidConfig(_) => "ConfigError",
            SourceError::Transport { .. } => "HttpError",
        }
    }

    /// Whether the error was detected while loading configuration, before any
    /// request was issued.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SourceError::MissingUrl { .. }
                | SourceError::MissingLayers { .. }
                | SourceError::InvalidConfig(_)
        )
    }
}

impl From<quick_xml::Error> for SourceError {
    fn from(err: quick_xml::Error) -> Self {
        SourceError::InvalidConfig(format!("XML error: {}", err))
    }
}

/// Every problem found while validating configuration.
///
/// Checks never stop at the first failure, so one of these can carry several
/// errors for the same source.
#[derive(Debug, Default)]
pub struct ConfigErrors(Vec<SourceError>);

impl ConfigErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: SourceError) {
        self.0.push(err);
    }

    pub fn extend(&mut self, other: ConfigErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<SourceError> {
        self.0
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), ConfigErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<SourceError> for ConfigErrors {
    fn from(err: SourceError) -> Self {
        Self(vec![err])
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}
