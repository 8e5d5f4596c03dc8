//! Errors that block a whole print batch

use thiserror::Error;

use crate::model::TemplateId;

/// Preconditions checked before any card is rendered
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PackingError {
    /// Nothing selected
    #[error("no entities selected: choose at least one card to print")]
    EmptySelection,

    /// No template to print with
    #[error("no template available: {reason}")]
    MissingTemplate { reason: String },

    /// Template geometry violates the physical invariants
    #[error("template '{template}' has invalid geometry: {reason}")]
    InvalidGeometry { template: TemplateId, reason: String },

    /// Sheet configuration cannot produce a layout
    #[error("invalid sheet configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl PackingError {
    /// Create a missing template error
    pub fn missing_template(reason: impl Into<String>) -> Self {
        Self::MissingTemplate {
            reason: reason.into(),
        }
    }

    /// Create an invalid geometry error
    pub fn invalid_geometry(template: &TemplateId, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            template: template.clone(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
