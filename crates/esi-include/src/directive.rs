//! Template-directive surface.
//!
//! The host template engine binds two call sites to these functions: one
//! that includes a fragment (`es_include`) and one that sets cache
//! directives for the current response (`es_cache`). Parameters arrive as
//! `(name, value)` pairs in source order, values as JSON scalars.

use serde_json::Value;
use tracing::warn;

use esi_core::{key_value_to_string, parse_ttl, KeyMap};
use esi_eas::EsiContext;

use crate::engine::IncludeEngine;
use crate::host::FragmentHost;
use crate::target::MethodTarget;

/// Handle an `es-include` invocation.
///
/// Exactly one of the `template` or `method` parameters selects the
/// fragment target; every other parameter becomes a cache key. Returns the
/// text to splice into the output, or an empty string when there is
/// nothing to include (missing target, malformed method spec, denial, or
/// an empty fragment).
pub fn es_include(
    params: &[(String, Value)],
    engine: &IncludeEngine,
    host: &mut dyn FragmentHost,
    ctx: &mut EsiContext,
) -> String {
    let mut keys = KeyMap::from_params(params);
    if let Some(template) = keys.remove("template") {
        if template.trim().is_empty() {
            warn!("es-include: empty template parameter");
            return String::new();
        }
        return engine.include_template(&template, &keys, host, ctx);
    }
    if let Some(spec) = keys.remove("method") {
        if spec.trim().is_empty() {
            warn!("es-include: empty method parameter");
            return String::new();
        }
        let target = match MethodTarget::parse(&spec) {
            Ok(target) => target,
            Err(err) => {
                warn!(method = %spec, %err, "es-include: invalid method parameter");
                return String::new();
            }
        };
        if !host.has_method(&target.class, &target.method) {
            warn!(method = %target, "es-include: method is not callable");
            return String::new();
        }
        return engine.include_method(&target, &keys, host, ctx);
    }
    warn!("es-include: missing parameter template or method");
    String::new()
}

/// Handle an `es-cache` invocation.
///
/// Recognized parameters: `ttl` and `extension` (TTL strings, see
/// [`parse_ttl`]), and the booleans `no-store`, `no-store-remote` and
/// `esi`. Bad values are dropped with a warning and leave the state
/// unchanged; unknown parameter names are warned about and ignored.
pub fn es_cache(params: &[(String, Value)], ctx: &mut EsiContext) {
    let mut ttl = None;
    let mut extension = None;
    for (name, value) in params {
        match name.as_str() {
            "ttl" => ttl = ttl_param(name, value),
            "extension" => extension = ttl_param(name, value),
            "no-store" => {
                if let Some(flag) = bool_param(name, value) {
                    ctx.set_no_store(flag);
                }
            }
            "no-store-remote" => {
                if let Some(flag) = bool_param(name, value) {
                    ctx.set_no_store_remote(flag);
                }
            }
            "esi" => {
                if let Some(flag) = bool_param(name, value) {
                    ctx.set_use_esi(flag);
                }
            }
            other => warn!(param = %other, "es-cache: unknown parameter"),
        }
    }
    match (ttl, extension) {
        (Some(ttl), extension) => ctx.set_max_age(ttl, extension.unwrap_or(0)),
        (None, Some(_)) => warn!("es-cache: extension without ttl is ignored"),
        (None, None) => {}
    }
}

fn ttl_param(name: &str, value: &Value) -> Option<u64> {
    let text = match key_value_to_string(name, value) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(_) => {
            warn!(param = %name, "es-cache: unsupported value type");
            return None;
        }
    };
    match parse_ttl(&text) {
        Ok(seconds) => Some(seconds),
        Err(err) => {
            warn!(param = %name, %err, "es-cache: not setting the max age");
            None
        }
    }
}

fn bool_param(name: &str, value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(s) if s == "true" => Some(true),
        Value::String(s) if s == "false" => Some(false),
        _ => {
            warn!(param = %name, "es-cache: expected a boolean value");
            None
        }
    }
}
