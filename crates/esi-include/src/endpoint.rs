//! Edge-fetch endpoint dispatcher.
//!
//! When the edge markup strategy is active, surrogates fetch fragment URLs
//! that re-enter the application. The HTTP layer routes those requests
//! here with the include type (the last path segment) and the raw query
//! pairs. The query string is surrogate-controlled input, so the guard is
//! applied again and every failure collapses into the same not-found
//! answer.

use tracing::error;

use esi_core::{header_names, KeyMap};
use esi_eas::EsiContext;

use crate::host::{with_template_vars, FragmentHost};
use crate::permission::PermissionGuard;
use crate::strategy::encode;
use crate::target::MethodTarget;

/// The include types the endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeType {
    /// Produce nothing; useful to blank out a fragment at the edge.
    Empty,
    /// Render a template and return its text as the response body.
    Template,
    /// Render a template and hand the text to the host page layout.
    TemplateInPagelayout,
    /// Call an instance method.
    Method,
    /// Call a static method.
    MethodStatic,
}

impl IncludeType {
    /// Parse the last path segment of an edge-fetch URL.
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        match segment {
            "empty" => Some(Self::Empty),
            "template" => Some(Self::Template),
            "template-in-pagelayout" => Some(Self::TemplateInPagelayout),
            "method" => Some(Self::Method),
            "method-static" => Some(Self::MethodStatic),
            _ => None,
        }
    }
}

/// Error from the endpoint dispatcher.
///
/// Deliberately a single variant: a missing parameter, an unknown target
/// and a policy denial all look the same from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("fragment not found")]
    NotFound,
}

/// Successful outcome of an edge fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeOutcome {
    /// Nothing to send; respond with an empty body.
    Empty,
    /// Fragment text to send as the response body.
    Fragment(String),
    /// Fragment text the host should embed in its page layout.
    InPagelayout(String),
}

/// Serve one edge-fetch request.
///
/// `segment` is the last path segment of the request URL; `query` the
/// decoded query pairs in order. Debug headers describing the resolved
/// keys and target are set on the context.
pub fn handle_include(
    segment: &str,
    query: &[(String, String)],
    guard: &PermissionGuard,
    host: &mut dyn FragmentHost,
    ctx: &mut EsiContext,
) -> Result<IncludeOutcome, EndpointError> {
    let mut keys = KeyMap::from_query_pairs(query.iter().map(|(n, v)| (n.as_str(), v.as_str())));
    set_keys_header(&keys, ctx);

    let include_type = IncludeType::from_path_segment(segment).ok_or_else(|| {
        error!(include_type = %segment, "unknown include type");
        EndpointError::NotFound
    })?;

    match include_type {
        IncludeType::Empty => Ok(IncludeOutcome::Empty),
        IncludeType::Template | IncludeType::TemplateInPagelayout => {
            let template = match keys.remove("template") {
                Some(template) if !template.trim().is_empty() => template,
                _ => {
                    error!("tried to include a template without specifying which");
                    return Err(EndpointError::NotFound);
                }
            };
            if !guard.is_template_allowed(&template) {
                error!(template = %template, "tried to include a template that is not allowed");
                return Err(EndpointError::NotFound);
            }
            ctx.set_header(header_names::X_ESI_TEMPLATE, encode(&template));
            let content = with_template_vars(host, &keys, ctx, |host, ctx| {
                host.render_template(&template, ctx).unwrap_or_default()
            });
            match include_type {
                IncludeType::TemplateInPagelayout => Ok(IncludeOutcome::InPagelayout(content)),
                _ => Ok(IncludeOutcome::Fragment(content)),
            }
        }
        IncludeType::Method | IncludeType::MethodStatic => {
            let class = match keys.remove("class") {
                Some(class) if !class.trim().is_empty() => class,
                _ => {
                    error!("tried to include a method call without specifying the class");
                    return Err(EndpointError::NotFound);
                }
            };
            let method = match keys.remove("method") {
                Some(method) if !method.trim().is_empty() => method,
                _ => {
                    error!("tried to include a method call without specifying the method");
                    return Err(EndpointError::NotFound);
                }
            };
            if !guard.is_method_allowed(&class, &method) {
                error!(class = %class, method = %method, "tried to include a method call that is not allowed");
                return Err(EndpointError::NotFound);
            }
            if !host.has_method(&class, &method) {
                error!(class = %class, method = %method, "tried to include a method call that is not callable");
                return Err(EndpointError::NotFound);
            }
            ctx.set_header(header_names::X_ESI_CLASS, encode(&class));
            ctx.set_header(header_names::X_ESI_METHOD, encode(&method));
            let target = if include_type == IncludeType::MethodStatic {
                MethodTarget::new_static(class, method)
            } else {
                MethodTarget::new_instance(class, method)
            };
            let content = host.call_method(&target, &keys, ctx).unwrap_or_default();
            Ok(IncludeOutcome::Fragment(content))
        }
    }
}

fn set_keys_header(keys: &KeyMap, ctx: &mut EsiContext) {
    let value = keys
        .iter()
        .map(|(name, value)| format!("{}={}", encode(name), encode(value)))
        .collect::<Vec<_>>()
        .join(" ");
    ctx.set_header(header_names::X_ESI_KEYS, value);
}
