//! Per-card render errors
//!
//! A render error belongs to one card: the packer turns it into a placeholder
//! unit and carries on with the rest of the batch.

use thiserror::Error;

use crate::model::{EntityId, TemplateId};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// The template's zone layout could not be parsed
    #[error("malformed zone layout in template '{template}': {reason}")]
    MalformedLayout { template: TemplateId, reason: String },

    /// The selection names an entity the roster does not have
    #[error("unknown entity '{id}'")]
    UnknownEntity { id: EntityId },
}

impl RenderError {
    /// Create a malformed layout error
    pub fn malformed(template: &TemplateId, reason: impl ToString) -> Self {
        Self::MalformedLayout {
            template: template.clone(),
            reason: reason.to_string(),
        }
    }

    /// Create an unknown entity error
    pub fn unknown_entity(id: &EntityId) -> Self {
        Self::UnknownEntity { id: id.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_layout_display() {
        let err = RenderError::malformed(&TemplateId::new("std"), "expected a sequence");
        assert_eq!(
            err.to_string(),
            "malformed zone layout in template 'std': expected a sequence"
        );
    }

    #[test]
    fn test_unknown_entity_display() {
        let err = RenderError::unknown_entity(&EntityId::new("E9"));
        assert!(err.to_string().contains("E9"));
    }
}
