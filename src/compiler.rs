//! # Route Compiler
//!
//! Turns exported components into registered routes. For every declared
//! method of a component the compiler asks the metadata store whether the
//! method carries a verb record *at method scope*; without one the method
//! is simply not exposed. Eligible methods get their sub-path resolved, a
//! fresh component instance activated, and the adapted handler registered
//! on the route table under the absolute path.

use crate::adapter::adapt;
use crate::metadata::{self, MetadataStore};
use crate::module::{Component, MethodSpec};
use crate::paths::route_path;
use crate::router::{RegisteredRoute, RouteTable};
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Compiles exported components into route table entries.
pub struct RouteCompiler<'t> {
    store: Arc<MetadataStore>,
    table: &'t mut RouteTable,
}

impl<'t> RouteCompiler<'t> {
    /// Create a compiler reading from `store` and registering into `table`.
    pub fn new(store: Arc<MetadataStore>, table: &'t mut RouteTable) -> Self {
        Self { store, table }
    }

    /// Process a module's exported components under the given path prefix.
    ///
    /// Components and their methods are handled in declaration order. A
    /// component with no eligible method registers nothing; that is a valid
    /// outcome, not an error.
    pub fn add_exported_components(&mut self, prefix: &str, components: &[Arc<Component>]) {
        for component in components {
            for method in component.methods() {
                self.add_route_from_method(component, method, prefix);
            }
        }
    }

    /// Compile one declared method, registering it when eligible.
    ///
    /// The verb is resolved with the exact method-scope lookup so a verb
    /// recorded at class scope never makes a method routable. An unknown
    /// verb value is skipped with a warning.
    pub fn add_route_from_method(
        &mut self,
        component: &Component,
        method: &MethodSpec,
        prefix: &str,
    ) {
        let Some(verb_value) =
            self.store
                .get_method(component.name(), method.name(), metadata::HTTP_METHOD)
        else {
            debug!(
                component = %component.name(),
                method = %method.name(),
                "No verb recorded at method scope, not exposing"
            );
            return;
        };

        let Some(verb) = supported_verb(&verb_value) else {
            warn!(
                component = %component.name(),
                method = %method.name(),
                verb = ?verb_value,
                "Unsupported verb metadata, skipping route"
            );
            return;
        };

        let sub_path = self
            .store
            .get_method(component.name(), method.name(), metadata::SUB_PATH)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        let full_path = route_path([prefix, sub_path.as_str()]);
        let handler = adapt(
            Arc::clone(&self.store),
            Arc::clone(component.name_arc()),
            Arc::clone(method.name_arc()),
            method.bind(),
        );

        self.table.register(RegisteredRoute {
            method: verb,
            path: Arc::from(full_path.as_str()),
            component: Arc::clone(component.name_arc()),
            action: Arc::clone(method.name_arc()),
            handler,
        });
    }
}

/// Parse a verb metadata value into a supported `Method`.
///
/// Values are lowercase verb strings; anything that is not a string, does
/// not parse, or falls outside the supported set resolves to `None`.
fn supported_verb(value: &Value) -> Option<Method> {
    let supported = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::OPTIONS,
        Method::HEAD,
        Method::TRACE,
    ];
    let verb = value.as_str()?.to_ascii_uppercase().parse::<Method>().ok()?;
    supported.contains(&verb).then_some(verb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_supported_verb_parses_lowercase() {
        assert_eq!(supported_verb(&json!("get")), Some(Method::GET));
        assert_eq!(supported_verb(&json!("post")), Some(Method::POST));
        assert_eq!(supported_verb(&json!("trace")), Some(Method::TRACE));
    }

    #[test]
    fn test_supported_verb_rejects_unknown() {
        assert_eq!(supported_verb(&json!("brew")), None);
        assert_eq!(supported_verb(&json!(42)), None);
        assert_eq!(supported_verb(&json!(null)), None);
    }
}
