//! Template store interface and an in-memory registry backed by JSON records

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{Template, TemplateId};

/// Errors that can occur while loading or querying templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found in the store
    #[error("template not found: {id}")]
    NotFound { id: String },

    /// Two records share an id
    #[error("duplicate template id: {id}")]
    Duplicate { id: String },

    /// Error reading a template file
    #[error("error reading template file {path}: {message}")]
    FileReadError { path: PathBuf, message: String },

    /// Records are not valid template JSON
    #[error("invalid template records: {0}")]
    InvalidRecords(#[from] serde_json::Error),
}

/// Read access to persisted templates
///
/// The surrounding application owns template persistence; this crate only reads.
pub trait TemplateStore {
    /// Every template visible to `tenant`: system templates plus the tenant's own
    ///
    /// A tenant record without a `tenantId` belongs to a single-tenant store and
    /// is visible to every tenant.
    fn visible_to(&self, tenant: &str) -> Vec<Template>;

    /// Look up one record by id, regardless of visibility
    fn get(&self, id: &TemplateId) -> Option<&Template>;
}

/// In-memory template store
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<TemplateId, Template>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template record
    pub fn register(&mut self, template: Template) -> Result<(), TemplateError> {
        if self.templates.contains_key(&template.id) {
            return Err(TemplateError::Duplicate {
                id: template.id.0.clone(),
            });
        }
        self.templates.insert(template.id.clone(), template);
        Ok(())
    }

    /// Build a registry from a JSON array of template records
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let records: Vec<Template> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for template in records {
            registry.register(template)?;
        }
        Ok(registry)
    }

    /// Load a JSON array of template records from a file
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| TemplateError::FileReadError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_json(&content)
    }

    /// Check if a template exists
    pub fn contains(&self, id: &TemplateId) -> bool {
        self.templates.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateStore for TemplateRegistry {
    fn visible_to(&self, tenant: &str) -> Vec<Template> {
        self.templates
            .values()
            .filter(|t| {
                t.is_system() || t.tenant_id.as_deref().map_or(true, |owner| owner == tenant)
            })
            .cloned()
            .collect()
    }

    fn get(&self, id: &TemplateId) -> Option<&Template> {
        self.templates.get(id)
    }
}
