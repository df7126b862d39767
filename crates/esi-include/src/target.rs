//! Fragment targets.

use esi_core::{EsiError, EsiResult};

/// What a fragment include points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentTarget {
    /// A template, by name.
    Template(String),
    /// A method call on an application class.
    Method(MethodTarget),
}

/// A method-call fragment target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTarget {
    /// The class the method lives on.
    pub class: String,
    /// The method name.
    pub method: String,
    /// Whether this is a static call, as opposed to
    /// instantiate-then-call.
    pub is_static: bool,
}

impl MethodTarget {
    /// Create a static method target.
    pub fn new_static(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
            is_static: true,
        }
    }

    /// Create an instance method target.
    pub fn new_instance(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
            is_static: false,
        }
    }

    /// Parse a method spec string.
    ///
    /// `Class->method` is an instance call, `Class::method` a static call.
    /// A missing separator, an extra separator, or an empty component is an
    /// error.
    pub fn parse(spec: &str) -> EsiResult<Self> {
        let (separator, is_static) = if spec.contains("->") {
            ("->", false)
        } else {
            ("::", true)
        };
        let mut parts = spec.split(separator);
        let class = parts.next().unwrap_or_default();
        let method = parts
            .next()
            .ok_or_else(|| EsiError::InvalidMethodSpec(format!("missing separator in {spec:?}")))?;
        if parts.next().is_some() {
            return Err(EsiError::InvalidMethodSpec(format!(
                "extra separator in {spec:?}"
            )));
        }
        if class.is_empty() || method.is_empty() {
            return Err(EsiError::InvalidMethodSpec(format!(
                "empty class or method in {spec:?}"
            )));
        }
        Ok(Self {
            class: class.to_string(),
            method: method.to_string(),
            is_static,
        })
    }
}

impl std::fmt::Display for MethodTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let separator = if self.is_static { "::" } else { "->" };
        write!(f, "{}{}{}", self.class, separator, self.method)
    }
}
