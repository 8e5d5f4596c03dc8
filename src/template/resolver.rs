//! Template resolution - collapses system defaults and tenant overrides into the effective set

use std::collections::{BTreeMap, HashSet};

use crate::model::{Template, TemplateId};

use super::registry::TemplateStore;

/// How an effective template relates to the system defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InheritanceStatus {
    /// System template used verbatim (no tenant override)
    Inherited,
    /// Tenant override of another template
    Customized,
    /// Tenant template with no parent
    Standalone,
}

impl InheritanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InheritanceStatus::Inherited => "inherited",
            InheritanceStatus::Customized => "customized",
            InheritanceStatus::Standalone => "standalone",
        }
    }
}

/// A template in the effective set
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveTemplate {
    pub template: Template,
    pub status: InheritanceStatus,
}

impl EffectiveTemplate {
    /// Id of the system template this one replaces, if any
    pub fn shadows(&self) -> Option<&TemplateId> {
        match self.status {
            InheritanceStatus::Customized => self.template.parent_template_id.as_ref(),
            _ => None,
        }
    }
}

/// More than one override found for a single parent template
///
/// All candidates are kept in the effective set; nothing is discarded silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionAmbiguity {
    pub parent: TemplateId,
    pub candidates: Vec<TemplateId>,
}

/// The effective template set for one tenant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub templates: Vec<EffectiveTemplate>,
    pub ambiguities: Vec<ResolutionAmbiguity>,
}

impl Resolution {
    /// Find an effective template by its own id or by the id of the template it overrides
    ///
    /// A caller holding a system template id lands on the tenant's override when one exists.
    pub fn find(&self, id: &TemplateId) -> Option<&EffectiveTemplate> {
        self.templates
            .iter()
            .find(|t| &t.template.id == id)
            .or_else(|| self.templates.iter().find(|t| t.shadows() == Some(id)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectiveTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Resolve a visible template set into the effective set
///
/// Every system template that has a tenant override is dropped in favour of the
/// override; everything else passes through unchanged. Output is sorted by id, so
/// the result does not depend on input order. Zone layouts are not inspected.
pub fn resolve_templates(visible: Vec<Template>) -> Resolution {
    let mut overrides: BTreeMap<TemplateId, Vec<TemplateId>> = BTreeMap::new();
    for template in visible.iter().filter(|t| t.is_override()) {
        if let Some(parent) = &template.parent_template_id {
            overrides
                .entry(parent.clone())
                .or_default()
                .push(template.id.clone());
        }
    }

    let system_ids: HashSet<&TemplateId> = visible
        .iter()
        .filter(|t| t.is_system())
        .map(|t| &t.id)
        .collect();

    let mut ambiguities = Vec::new();
    for (parent, candidates) in overrides.iter_mut() {
        if !system_ids.contains(parent) {
            tracing::debug!(
                parent = %parent,
                "override references a template outside the visible set"
            );
        }
        if candidates.len() > 1 {
            candidates.sort();
            tracing::warn!(
                parent = %parent,
                candidates = ?candidates,
                "multiple overrides for one template, keeping all of them"
            );
            ambiguities.push(ResolutionAmbiguity {
                parent: parent.clone(),
                candidates: candidates.clone(),
            });
        }
    }

    let mut templates: Vec<EffectiveTemplate> = visible
        .into_iter()
        .filter(|t| !(t.is_system() && overrides.contains_key(&t.id)))
        .map(|template| {
            let status = if template.is_system() {
                InheritanceStatus::Inherited
            } else if template.is_override() {
                InheritanceStatus::Customized
            } else {
                InheritanceStatus::Standalone
            };
            EffectiveTemplate { template, status }
        })
        .collect();
    templates.sort_by(|a, b| a.template.id.cmp(&b.template.id));

    Resolution {
        templates,
        ambiguities,
    }
}

/// Resolve the effective set for one tenant from a store
///
/// Computed fresh on every call; nothing is cached between requests.
pub fn resolve_for_tenant(store: &dyn TemplateStore, tenant: &str) -> Resolution {
    let resolution = resolve_templates(store.visible_to(tenant));
    tracing::debug!(
        tenant,
        effective = resolution.len(),
        "resolved template set"
    );
    resolution
}
