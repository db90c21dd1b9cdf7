use crate::adapter::RouteHandler;
use http::Method;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A compiled route: verb, absolute path, and the adapted handler together
/// with the component/method pair it came from.
///
/// Routes are derived from the module tree on every bootstrap and never
/// persisted.
#[derive(Clone)]
pub struct RegisteredRoute {
    /// HTTP verb the route answers.
    pub method: Method,
    /// Absolute path with a leading `/`.
    pub path: Arc<str>,
    /// Name of the component the handler belongs to.
    pub component: Arc<str>,
    /// Name of the component method behind the handler.
    pub action: Arc<str>,
    /// Adapted handler invoked by the facade.
    pub handler: RouteHandler,
}

impl RegisteredRoute {
    /// `component.action` identifier used in logs and route dumps.
    #[must_use]
    pub fn handler_name(&self) -> String {
        format!("{}.{}", self.component, self.action)
    }
}

impl fmt::Debug for RegisteredRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredRoute")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("component", &self.component)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// Flattened route table matched by exact verb and path.
///
/// Registration is last-write-wins: a later registration at an occupied
/// verb+path replaces the earlier one with a warning, so module declaration
/// order decides the winner. Lookup is a plain map probe; paths carry no
/// patterns or parameters.
#[derive(Clone, Default)]
pub struct RouteTable {
    /// verb -> path -> route
    routes: HashMap<Method, HashMap<Arc<str>, RegisteredRoute>>,
    /// Keys in first-registration order, for deterministic dumps.
    order: Vec<(Method, Arc<str>)>,
}

impl RouteTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route under its verb and path.
    ///
    /// If the slot is already taken the existing route is replaced and a
    /// warning names both registrations. Collisions are never an error.
    pub fn register(&mut self, route: RegisteredRoute) {
        debug_assert!(route.path.starts_with('/'), "route paths are absolute");
        let method = route.method.clone();
        let path = Arc::clone(&route.path);
        let handler_name = route.handler_name();

        let by_path = self.routes.entry(method.clone()).or_default();
        if let Some(previous) = by_path.insert(Arc::clone(&path), route) {
            warn!(
                method = %method,
                path = %path,
                replaced = %previous.handler_name(),
                winner = %handler_name,
                "Replaced existing route - last registration wins"
            );
        } else {
            self.order.push((method.clone(), Arc::clone(&path)));
            info!(
                method = %method,
                path = %path,
                handler = %handler_name,
                total_routes = self.len(),
                "Route registered"
            );
        }
    }

    /// Match a request to a registered route.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&RegisteredRoute> {
        debug!(method = %method, path = %path, "Route match attempt");
        match self.routes.get(method).and_then(|by_path| by_path.get(path)) {
            Some(route) => {
                debug!(
                    method = %method,
                    path = %path,
                    handler = %route.handler_name(),
                    "Route matched"
                );
                Some(route)
            }
            None => {
                warn!(method = %method, path = %path, "No route matched");
                None
            }
        }
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    /// Whether the table holds no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate routes in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredRoute> {
        self.order.iter().filter_map(|(method, path)| {
            self.routes
                .get(method)
                .and_then(|by_path| by_path.get(path.as_ref()))
        })
    }

    /// Print all registered routes to stdout.
    ///
    /// Useful for verifying what a module tree compiled to.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.len());
        for route in self.iter() {
            println!(
                "[route] {} {} -> {}",
                route.method,
                route.path,
                route.handler_name()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Reply;

    fn route(method: Method, path: &str, component: &str, action: &str) -> RegisteredRoute {
        RegisteredRoute {
            method,
            path: Arc::from(path),
            component: Arc::from(component),
            action: Arc::from(action),
            handler: Arc::new(|_req| Ok(Reply::new())),
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        let mut table = RouteTable::new();
        table.register(route(Method::GET, "/cats", "cats", "list"));

        assert!(table.lookup(&Method::GET, "/cats").is_some());
        assert!(table.lookup(&Method::POST, "/cats").is_none());
        assert!(table.lookup(&Method::GET, "/cats/1").is_none());
        assert!(table.lookup(&Method::GET, "/cat").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut table = RouteTable::new();
        table.register(route(Method::GET, "/x", "first", "a"));
        table.register(route(Method::GET, "/x", "second", "b"));

        assert_eq!(table.len(), 1);
        let winner = table.lookup(&Method::GET, "/x").map(|r| r.handler_name());
        assert_eq!(winner.as_deref(), Some("second.b"));
    }

    #[test]
    fn test_iter_preserves_registration_order() {
        let mut table = RouteTable::new();
        table.register(route(Method::GET, "/a", "c", "a"));
        table.register(route(Method::POST, "/a", "c", "b"));
        table.register(route(Method::GET, "/b", "c", "c"));

        let order: Vec<String> = table.iter().map(|r| r.handler_name()).collect();
        assert_eq!(order, vec!["c.a", "c.b", "c.c"]);
    }
}
