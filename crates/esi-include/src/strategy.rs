//! Include strategies.
//!
//! The strategy decides what an include resolves to: an edge directive for
//! a surrogate to process, the evaluated content itself, or nothing. It is
//! selected once from configuration; an unknown handler name degrades to
//! [`IncludeStrategy::Discard`] so a misconfigured system renders visibly
//! empty fragments instead of failing pages.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::error;

use esi_core::{header_names, IncludeConfig, KeyMap};
use esi_eas::EsiContext;

use crate::host::{with_template_vars, FragmentHost};
use crate::target::MethodTarget;

/// Query-string encoding: RFC 3986 unreserved characters stay literal.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub(crate) fn encode(component: &str) -> String {
    utf8_percent_encode(component, QUERY).to_string()
}

/// How fragment includes are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeStrategy {
    /// Drop the include and resolve to nothing.
    Discard,
    /// Emit edge markup for a surrogate to process.
    EdgeMarkup(EdgeMarkup),
    /// Evaluate the fragment in-process and inline the result.
    InProcess(InProcessEval),
}

impl IncludeStrategy {
    /// Select the strategy from configuration, once per process.
    ///
    /// Unknown handler names resolve to `Discard`.
    pub fn from_config(config: &IncludeConfig) -> Self {
        match config.handler.as_str() {
            "discard" => Self::Discard,
            "edge" => Self::EdgeMarkup(EdgeMarkup::from_config(config)),
            "inline" => Self::InProcess(InProcessEval),
            other => {
                error!(handler = %other, "unknown include handler, falling back to discard");
                Self::Discard
            }
        }
    }

    /// Resolve a template include to its output text.
    ///
    /// Empty string means nothing to include.
    pub fn resolve_template(
        &self,
        template: &str,
        keys: &KeyMap,
        host: &mut dyn FragmentHost,
        ctx: &mut EsiContext,
    ) -> String {
        match self {
            Self::Discard => String::new(),
            Self::EdgeMarkup(edge) => edge.include_template(template, keys, ctx),
            Self::InProcess(eval) => eval.eval_template(template, keys, host, ctx),
        }
    }

    /// Resolve a method-call include to its output text.
    pub fn resolve_method(
        &self,
        target: &MethodTarget,
        keys: &KeyMap,
        host: &mut dyn FragmentHost,
        ctx: &mut EsiContext,
    ) -> String {
        match self {
            Self::Discard => String::new(),
            Self::EdgeMarkup(edge) => edge.include_method(target, keys, ctx),
            Self::InProcess(eval) => eval.eval_method(target, keys, host, ctx),
        }
    }
}

/// Emits `<esi:include/>` tags pointing at the edge-fetch endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMarkup {
    /// URL prefix of the edge-fetch endpoint.
    pub prefix: String,
    /// Emit `X-Do-ESI: true` once something has been included.
    pub send_do_esi_header: bool,
    /// Annotate the include tag to continue silently on fetch failure.
    pub continue_on_error: bool,
}

impl EdgeMarkup {
    /// Build from the include configuration.
    pub fn from_config(config: &IncludeConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            send_do_esi_header: config.send_do_esi_header,
            continue_on_error: config.continue_on_error,
        }
    }

    /// Edge markup for a template include.
    pub fn include_template(&self, template: &str, keys: &KeyMap, ctx: &mut EsiContext) -> String {
        let url = format!("{}/template?template={}", self.prefix, encode(template));
        self.include_tag(url, keys, ctx)
    }

    /// Edge markup for a method-call include.
    pub fn include_method(
        &self,
        target: &MethodTarget,
        keys: &KeyMap,
        ctx: &mut EsiContext,
    ) -> String {
        let url = format!(
            "{}/method{}?class={}&method={}",
            self.prefix,
            if target.is_static { "-static" } else { "" },
            encode(&target.class),
            encode(&target.method),
        );
        self.include_tag(url, keys, ctx)
    }

    fn include_tag(&self, mut url: String, keys: &KeyMap, ctx: &mut EsiContext) -> String {
        if self.send_do_esi_header {
            ctx.set_header(header_names::X_DO_ESI, "true");
        }
        ctx.set_use_esi(true);
        for (name, value) in keys.iter() {
            url.push('&');
            url.push_str(&encode(name));
            url.push('=');
            url.push_str(&encode(value));
        }
        if self.continue_on_error {
            format!("<esi:include src=\"{url}\" onerror=\"continue\"/>")
        } else {
            format!("<esi:include src=\"{url}\"/>")
        }
    }
}

/// Evaluates fragments in the current process.
///
/// The fragment runs against a fresh directive state so its cache settings
/// cannot leak into the header of the outer response, and template
/// variables shadowed by the keys are restored afterwards. Behaviour can
/// still differ from a real edge fetch where the host engine keeps other
/// per-request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InProcessEval;

impl InProcessEval {
    /// Render a template with the keys installed as template variables.
    pub fn eval_template(
        &self,
        template: &str,
        keys: &KeyMap,
        host: &mut dyn FragmentHost,
        ctx: &mut EsiContext,
    ) -> String {
        ctx.isolated(|ctx| {
            with_template_vars(host, keys, ctx, |host, ctx| {
                host.render_template(template, ctx).unwrap_or_default()
            })
        })
    }

    /// Call a method with the keys as its sole argument.
    pub fn eval_method(
        &self,
        target: &MethodTarget,
        keys: &KeyMap,
        host: &mut dyn FragmentHost,
        ctx: &mut EsiContext,
    ) -> String {
        ctx.isolated(|ctx| host.call_method(target, keys, ctx).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::tests_support::StubHost;
    use esi_core::header_names;

    const CAPS: &str = r#"proxy="ESI/1.0 Surrogate/1.0""#;

    fn keys(pairs: &[(&str, &str)]) -> KeyMap {
        let mut keys = KeyMap::new();
        for (name, value) in pairs {
            keys.insert(*name, *value);
        }
        keys
    }

    #[test]
    fn test_discard_resolves_empty() {
        let strategy = IncludeStrategy::Discard;
        let mut host = StubHost::new();
        let mut ctx = EsiContext::without_surrogates();
        let out = strategy.resolve_template("parts/menu.tpl", &KeyMap::new(), &mut host, &mut ctx);
        assert_eq!(out, "");
        assert!(!ctx.control().use_esi);
    }

    #[test]
    fn test_unknown_handler_falls_back_to_discard() {
        let config = IncludeConfig {
            handler: "carrier-pigeon".to_string(),
            ..Default::default()
        };
        assert_eq!(IncludeStrategy::from_config(&config), IncludeStrategy::Discard);
    }

    #[test]
    fn test_edge_markup_template_tag() {
        let edge = EdgeMarkup {
            prefix: "/esi/include".to_string(),
            send_do_esi_header: false,
            continue_on_error: false,
        };
        let mut ctx = EsiContext::from_capability_header(Some(CAPS));
        let tag = edge.include_template(
            "parts/menu.tpl",
            &keys(&[("page", "2"), ("q", "a b")]),
            &mut ctx,
        );
        assert_eq!(
            tag,
            "<esi:include src=\"/esi/include/template?template=parts%2Fmenu.tpl&page=2&q=a%20b\"/>"
        );
        assert!(ctx.control().use_esi);
        assert_eq!(ctx.control_header(), Some("content=\"ESI/1.0\""));
        assert_eq!(ctx.headers().get(header_names::X_DO_ESI), None);
    }

    #[test]
    fn test_edge_markup_method_tags() {
        let edge = EdgeMarkup {
            prefix: "/esi/include".to_string(),
            send_do_esi_header: false,
            continue_on_error: false,
        };
        let mut ctx = EsiContext::without_surrogates();
        let tag = edge.include_method(
            &MethodTarget::new_static("Menu", "render"),
            &KeyMap::new(),
            &mut ctx,
        );
        assert_eq!(
            tag,
            "<esi:include src=\"/esi/include/method-static?class=Menu&method=render\"/>"
        );
        let tag = edge.include_method(
            &MethodTarget::new_instance("Menu", "render"),
            &KeyMap::new(),
            &mut ctx,
        );
        assert_eq!(
            tag,
            "<esi:include src=\"/esi/include/method?class=Menu&method=render\"/>"
        );
    }

    #[test]
    fn test_edge_markup_continue_on_error_and_sentinel() {
        let edge = EdgeMarkup {
            prefix: "/esi/include".to_string(),
            send_do_esi_header: true,
            continue_on_error: true,
        };
        let mut ctx = EsiContext::without_surrogates();
        let tag = edge.include_template("parts/menu.tpl", &KeyMap::new(), &mut ctx);
        assert!(tag.ends_with("\" onerror=\"continue\"/>"));
        assert_eq!(ctx.headers().get(header_names::X_DO_ESI), Some("true"));
    }

    #[test]
    fn test_in_process_template_isolation() {
        let mut host = StubHost::new();
        host.templates.insert(
            "parts/menu.tpl".to_string(),
            "menu for page {page}".to_string(),
        );
        host.cache_on_render = Some(60);
        let mut ctx = EsiContext::from_capability_header(Some(CAPS));
        ctx.set_max_age(600, 0);

        let out = InProcessEval.eval_template(
            "parts/menu.tpl",
            &keys(&[("page", "2")]),
            &mut host,
            &mut ctx,
        );
        assert_eq!(out, "menu for page 2");
        // The fragment's set_max_age(60) stayed inside the bracket.
        assert_eq!(ctx.control_header(), Some("max-age=600"));
        assert_eq!(host.variable("page"), None);
    }

    #[test]
    fn test_in_process_missing_template_is_empty() {
        let mut host = StubHost::new();
        let mut ctx = EsiContext::without_surrogates();
        let out = InProcessEval.eval_template("nope.tpl", &KeyMap::new(), &mut host, &mut ctx);
        assert_eq!(out, "");
    }

    #[test]
    fn test_in_process_method_call() {
        let mut host = StubHost::new();
        host.method_output = Some("rendered by method".to_string());
        let mut ctx = EsiContext::without_surrogates();
        let out = InProcessEval.eval_method(
            &MethodTarget::new_static("Menu", "render"),
            &KeyMap::new(),
            &mut host,
            &mut ctx,
        );
        assert_eq!(out, "rendered by method");
    }
}
