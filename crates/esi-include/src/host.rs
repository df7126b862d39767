//! The seam to the host application.

use esi_core::KeyMap;
use esi_eas::EsiContext;

use crate::target::MethodTarget;

/// What the host application provides for in-process fragment evaluation:
/// a template engine with named variables, and method dispatch.
///
/// Variable access works on the engine's current scope. Callers that
/// install variables for a fragment are expected to restore the previous
/// values afterwards; [`crate::InProcessEval`] and the endpoint dispatcher
/// both do.
pub trait FragmentHost {
    /// The current value of a template variable, if set.
    fn variable(&self, name: &str) -> Option<String>;

    /// Set a template variable.
    fn set_variable(&mut self, name: &str, value: &str);

    /// Remove a template variable.
    fn unset_variable(&mut self, name: &str);

    /// Render a template. `None` means the template did not produce text.
    ///
    /// Directive calls made during rendering go through `ctx`.
    fn render_template(&mut self, template: &str, ctx: &mut EsiContext) -> Option<String>;

    /// Whether the given method target can be called.
    fn has_method(&self, class: &str, method: &str) -> bool;

    /// Call a method with the key map as its sole argument. `None` means
    /// the call did not produce text.
    fn call_method(
        &mut self,
        target: &MethodTarget,
        keys: &KeyMap,
        ctx: &mut EsiContext,
    ) -> Option<String>;
}

/// Install `keys` as template variables, run `f`, and restore the previous
/// values (or absence) of every shadowed variable afterwards.
pub(crate) fn with_template_vars<R>(
    host: &mut dyn FragmentHost,
    keys: &KeyMap,
    ctx: &mut EsiContext,
    f: impl FnOnce(&mut dyn FragmentHost, &mut EsiContext) -> R,
) -> R {
    let mut shadowed = Vec::with_capacity(keys.len());
    for (name, value) in keys.iter() {
        shadowed.push((name.to_string(), host.variable(name)));
        host.set_variable(name, value);
    }
    let result = f(host, ctx);
    for (name, previous) in shadowed {
        match previous {
            Some(value) => host.set_variable(&name, &value),
            None => host.unset_variable(&name),
        }
    }
    result
}

#[cfg(test)]
pub(crate) mod tests_support {
    use std::collections::{HashMap, HashSet};

    use esi_core::KeyMap;
    use esi_eas::EsiContext;

    use crate::target::MethodTarget;

    use super::FragmentHost;

    /// Test double for the host application.
    ///
    /// Templates are plain strings where `{name}` expands to the variable
    /// of that name at render time.
    pub struct StubHost {
        pub vars: HashMap<String, String>,
        pub templates: HashMap<String, String>,
        pub known_methods: HashSet<(String, String)>,
        pub method_output: Option<String>,
        /// When set, rendering or calling sets this max age on the
        /// context, like a fragment issuing its own cache directives.
        pub cache_on_render: Option<u64>,
        pub last_method_call: Option<(MethodTarget, KeyMap)>,
    }

    impl StubHost {
        pub fn new() -> Self {
            Self {
                vars: HashMap::new(),
                templates: HashMap::new(),
                known_methods: HashSet::new(),
                method_output: None,
                cache_on_render: None,
                last_method_call: None,
            }
        }

        pub fn allow_method(&mut self, class: &str, method: &str) {
            self.known_methods
                .insert((class.to_string(), method.to_string()));
        }
    }

    impl FragmentHost for StubHost {
        fn variable(&self, name: &str) -> Option<String> {
            self.vars.get(name).cloned()
        }

        fn set_variable(&mut self, name: &str, value: &str) {
            self.vars.insert(name.to_string(), value.to_string());
        }

        fn unset_variable(&mut self, name: &str) {
            self.vars.remove(name);
        }

        fn render_template(&mut self, template: &str, ctx: &mut EsiContext) -> Option<String> {
            let body = self.templates.get(template)?.clone();
            if let Some(max_age) = self.cache_on_render {
                ctx.set_max_age(max_age, 0);
            }
            let mut rendered = body;
            for (name, value) in &self.vars {
                rendered = rendered.replace(&format!("{{{name}}}"), value);
            }
            Some(rendered)
        }

        fn has_method(&self, class: &str, method: &str) -> bool {
            self.known_methods
                .contains(&(class.to_string(), method.to_string()))
        }

        fn call_method(
            &mut self,
            target: &MethodTarget,
            keys: &KeyMap,
            ctx: &mut EsiContext,
        ) -> Option<String> {
            if let Some(max_age) = self.cache_on_render {
                ctx.set_max_age(max_age, 0);
            }
            self.last_method_call = Some((target.clone(), keys.clone()));
            self.method_output.clone()
        }
    }
}
