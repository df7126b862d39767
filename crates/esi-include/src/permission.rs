//! Allow-list gating for fragment targets.

use std::collections::HashSet;

use esi_core::PermissionsConfig;

/// Allow-lists for templates and method calls.
///
/// Both lists fail closed: an empty list allows nothing. A method entry
/// naming only a class allows every method on that class; `Class::method`
/// allows one exact pair.
#[derive(Debug, Clone, Default)]
pub struct PermissionGuard {
    templates: HashSet<String>,
    classes: HashSet<String>,
    methods: HashSet<(String, String)>,
}

impl PermissionGuard {
    /// Create a guard that allows nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a guard from the configured allow-lists.
    pub fn from_config(config: &PermissionsConfig) -> Self {
        let mut guard = Self::new();
        for template in &config.allowed_templates {
            guard.allow_template(template);
        }
        for entry in &config.allowed_methods {
            guard.allow_method_entry(entry);
        }
        guard
    }

    /// Allow a template by name.
    pub fn allow_template(&mut self, template: impl Into<String>) {
        self.templates.insert(template.into());
    }

    /// Allow a method entry: a bare class name, or `Class::method`.
    pub fn allow_method_entry(&mut self, entry: &str) {
        match entry.split_once("::") {
            Some((class, method)) => {
                self.methods
                    .insert((class.to_string(), method.to_string()));
            }
            None => {
                self.classes.insert(entry.to_string());
            }
        }
    }

    /// Whether the given template may be included.
    pub fn is_template_allowed(&self, template: &str) -> bool {
        self.templates.contains(template)
    }

    /// Whether the given method may be called.
    pub fn is_method_allowed(&self, class: &str, method: &str) -> bool {
        self.classes.contains(class)
            || self
                .methods
                .contains(&(class.to_string(), method.to_string()))
    }
}
