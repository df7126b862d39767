//! Guard-then-strategy front door for fragment includes.

use tracing::warn;

use esi_core::{EsiConfig, KeyMap};
use esi_eas::EsiContext;

use crate::host::FragmentHost;
use crate::permission::PermissionGuard;
use crate::strategy::IncludeStrategy;
use crate::target::MethodTarget;

/// Resolves fragment includes behind the permission guard.
///
/// A denied target resolves to the same empty string as a missing one, so
/// an outside observer cannot probe the allow-list.
#[derive(Debug)]
pub struct IncludeEngine {
    strategy: IncludeStrategy,
    guard: PermissionGuard,
}

impl IncludeEngine {
    /// Build the engine from configuration, selecting the strategy once.
    pub fn from_config(config: &EsiConfig) -> Self {
        Self {
            strategy: IncludeStrategy::from_config(&config.include),
            guard: PermissionGuard::from_config(&config.permissions),
        }
    }

    /// Build from explicit parts.
    pub fn new(strategy: IncludeStrategy, guard: PermissionGuard) -> Self {
        Self { strategy, guard }
    }

    /// The permission guard in use.
    pub fn guard(&self) -> &PermissionGuard {
        &self.guard
    }

    /// The strategy in use.
    pub fn strategy(&self) -> &IncludeStrategy {
        &self.strategy
    }

    /// Resolve a template include, or empty if denied or absent.
    pub fn include_template(
        &self,
        template: &str,
        keys: &KeyMap,
        host: &mut dyn FragmentHost,
        ctx: &mut EsiContext,
    ) -> String {
        if !self.guard.is_template_allowed(template) {
            warn!(template = %template, "tried to include a template that is not allowed");
            return String::new();
        }
        self.strategy.resolve_template(template, keys, host, ctx)
    }

    /// Resolve a method-call include, or empty if denied or absent.
    pub fn include_method(
        &self,
        target: &MethodTarget,
        keys: &KeyMap,
        host: &mut dyn FragmentHost,
        ctx: &mut EsiContext,
    ) -> String {
        if !self.guard.is_method_allowed(&target.class, &target.method) {
            warn!(method = %target, "tried to include a method call that is not allowed");
            return String::new();
        }
        self.strategy.resolve_method(target, keys, host, ctx)
    }
}
