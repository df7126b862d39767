//! Request-scoped negotiation context.

use std::cell::OnceCell;

use esi_core::{header_names, ResponseHeaders};

use crate::control::SurrogateControl;
use crate::surrogate::{parse_capability_header, Surrogate, ESI_1_0, SURROGATE_1_0};

/// An opaque handle to a saved [`SurrogateControl`] state.
///
/// Returned by [`EsiContext::swap`] and only meaningful when fed back into
/// it; the wrapped state is deliberately inaccessible.
#[derive(Debug)]
pub struct ControlScope(SurrogateControl);

/// Request-scoped owner of the EAS negotiation state.
///
/// One context is created per request from the `Surrogate-Capability`
/// header and threaded through every call that touches cache directives or
/// response headers. It is never shared between requests.
///
/// Every directive mutation re-renders the `Surrogate-Control` response
/// header, so the header always reflects the current state. When no
/// negotiated surrogate advertises `Surrogate/1.0` the header is never set
/// at all.
#[derive(Debug)]
pub struct EsiContext {
    capability_header: Option<String>,
    surrogates: OnceCell<Vec<Surrogate>>,
    control: SurrogateControl,
    headers: ResponseHeaders,
}

impl EsiContext {
    /// Create a context from the raw `Surrogate-Capability` header value,
    /// if the request carried one.
    pub fn from_capability_header(header: Option<&str>) -> Self {
        Self {
            capability_header: header.map(|h| h.trim().to_string()),
            surrogates: OnceCell::new(),
            control: SurrogateControl::new(),
            headers: ResponseHeaders::new(),
        }
    }

    /// Create a context for a request with no surrogate in front of it.
    pub fn without_surrogates() -> Self {
        Self::from_capability_header(None)
    }

    /// The surrogates identified from the capability header.
    ///
    /// Parsed on first use and memoized for the rest of the request; the
    /// header is immutable once the request has started.
    pub fn surrogates(&self) -> &[Surrogate] {
        self.surrogates.get_or_init(|| {
            self.capability_header
                .as_deref()
                .map(parse_capability_header)
                .unwrap_or_default()
        })
    }

    /// Whether any identified surrogate advertised the given capability.
    pub fn has_capability(&self, capability: &str) -> bool {
        self.surrogates()
            .iter()
            .any(|s| s.has_capability(capability))
    }

    /// Whether any identified surrogate can do ESI processing.
    pub fn has_esi_capability(&self) -> bool {
        self.has_capability(ESI_1_0)
    }

    /// Set whether this response should be ESI processed.
    pub fn set_use_esi(&mut self, use_esi: bool) {
        self.control.use_esi = use_esi;
        self.render_control_header();
    }

    /// Set the maximum age and freshness extension, in seconds.
    pub fn set_max_age(&mut self, max_age: u64, freshness_extension: u64) {
        self.control.max_age = Some(max_age);
        self.control.freshness_extension = freshness_extension;
        self.render_control_header();
    }

    /// Set whether surrogates may store this response.
    pub fn set_no_store(&mut self, no_store: bool) {
        self.control.no_store = no_store;
        self.render_control_header();
    }

    /// Set whether remote surrogates may store this response.
    pub fn set_no_store_remote(&mut self, no_store_remote: bool) {
        self.control.no_store_remote = no_store_remote;
        self.render_control_header();
    }

    /// Read access to the current directive state.
    pub fn control(&self) -> &SurrogateControl {
        &self.control
    }

    /// The current `Surrogate-Control` header value, if one is set.
    pub fn control_header(&self) -> Option<&str> {
        self.headers.get(header_names::SURROGATE_CONTROL)
    }

    /// Render the directive state into the `Surrogate-Control` header.
    ///
    /// Called after every mutation; call it once more at response-emission
    /// time. Re-rendering an unchanged state is byte-identical. Without a
    /// `Surrogate/1.0` surrogate there is no compliant consumer and the
    /// header is left unset.
    pub fn render_control_header(&mut self) {
        if !self.has_capability(SURROGATE_1_0) {
            return;
        }
        let value = self.control.render();
        self.headers.set(header_names::SURROGATE_CONTROL, value);
    }

    /// Replace the current directive state.
    ///
    /// Installs `scope` (or a fresh neutral state for `None`), re-renders
    /// the header for the installed state, and returns the previous state
    /// as an opaque handle. Swaps must nest LIFO within a request: callers
    /// evaluating a fragment in-process swap in `None`, evaluate, then swap
    /// the returned handle back on every exit path. Prefer
    /// [`EsiContext::isolated`], which does exactly that.
    pub fn swap(&mut self, scope: Option<ControlScope>) -> ControlScope {
        let incoming = scope.map(|s| s.0).unwrap_or_default();
        let previous = std::mem::replace(&mut self.control, incoming);
        self.render_control_header();
        ControlScope(previous)
    }

    /// Run `f` against a fresh directive state, restoring the current one
    /// afterwards.
    ///
    /// Directive calls made inside the closure only affect the fresh state;
    /// once the closure returns, the outer state and its header rendering
    /// are back in place.
    pub fn isolated<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.swap(None);
        let result = f(self);
        self.swap(Some(saved));
        result
    }

    /// Set an arbitrary response header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    /// The response headers accumulated for this request.
    pub fn headers(&self) -> &ResponseHeaders {
        &self.headers
    }
}
