//! Template store access and override resolution
//!
//! Templates come in two tiers: system defaults, and tenant templates. A tenant
//! template with a `parentTemplateId` overrides that system template for the
//! tenant; only one level of override is modelled.
//!
//! # Example
//!
//! ```rust
//! use cardsheet::template::{resolve_for_tenant, TemplateRegistry};
//!
//! let registry = TemplateRegistry::from_json(r#"[
//!     {"id": "std", "ownerScope": "system", "name": "ID-Standard", "width": 86, "height": 54},
//!     {"id": "t1-std", "ownerScope": "tenant", "tenantId": "t1",
//!      "parentTemplateId": "std", "name": "ID-Standard", "width": 86, "height": 54}
//! ]"#).unwrap();
//!
//! let resolution = resolve_for_tenant(&registry, "t1");
//! assert_eq!(resolution.len(), 1);
//! assert_eq!(resolution.templates[0].template.id.as_str(), "t1-std");
//! ```

mod registry;
mod resolver;

pub use registry::{TemplateError, TemplateRegistry, TemplateStore};
pub use resolver::{
    resolve_for_tenant, resolve_templates, EffectiveTemplate, InheritanceStatus, Resolution,
    ResolutionAmbiguity,
};
