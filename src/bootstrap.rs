//! # Application Bootstrap
//!
//! Ties the pieces together: [`App::build`] walks a module tree once,
//! compiling its route table and seeding the metadata store, and the
//! resulting [`App`] serves that table over HTTP or hands it out for
//! inspection. Registration happens entirely before the first request;
//! nothing about the table changes while the server runs.

use crate::metadata::MetadataStore;
use crate::middleware::{MetricsMiddleware, Middleware};
use crate::module::{Module, ModuleResolver};
use crate::router::RouteTable;
use crate::server::{AppService, HttpServer, ServerHandle};
use std::io;
use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use tracing::info;

/// A compiled application: the route table and metadata store produced
/// from one module tree, plus the middleware chain to serve them with.
///
/// ```
/// use http::Method;
/// use trellis::{App, ComponentBuilder, Module};
///
/// let status = ComponentBuilder::new("status", || ())
///     .route("show", Method::GET, "", |_, _req, reply| {
///         reply.body(serde_json::json!({ "ok": true }));
///         Ok(())
///     })
///     .build();
/// let root = Module::builder().export(status).build();
///
/// let app = App::build(&root);
/// assert_eq!(app.routes().len(), 1);
/// ```
pub struct App {
    store: Arc<MetadataStore>,
    table: Arc<RouteTable>,
    middlewares: Vec<Arc<dyn Middleware>>,
    metrics: Option<Arc<MetricsMiddleware>>,
}

impl App {
    /// Compile an application from the root of a module tree.
    ///
    /// Builds a fresh metadata store and route table every time, so
    /// rebuilding from the same tree is idempotent.
    #[must_use]
    pub fn build(root: &Arc<Module>) -> Self {
        let store = Arc::new(MetadataStore::new());
        let mut table = RouteTable::new();
        ModuleResolver::new(Arc::clone(&store), &mut table).unpack(root, "");
        info!(route_count = table.len(), "Application routes compiled");
        Self {
            store,
            table: Arc::new(table),
            middlewares: Vec::new(),
            metrics: None,
        }
    }

    /// Append a middleware to the chain.
    pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    /// Install a metrics middleware and expose it on `/metrics`.
    ///
    /// Returns the instance so callers can read counters directly.
    pub fn enable_metrics(&mut self) -> Arc<MetricsMiddleware> {
        let metrics = Arc::new(MetricsMiddleware::new());
        self.middlewares.push(Arc::clone(&metrics) as Arc<dyn Middleware>);
        self.metrics = Some(Arc::clone(&metrics));
        metrics
    }

    /// The compiled route table.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    /// The metadata store seeded from the module tree.
    #[must_use]
    pub fn metadata(&self) -> &MetadataStore {
        &self.store
    }

    /// Build the HTTP service over the compiled table.
    #[must_use]
    pub fn service(&self) -> AppService {
        AppService {
            table: Arc::clone(&self.table),
            middlewares: self.middlewares.clone(),
            metrics: self.metrics.clone(),
        }
    }

    /// Serve on `0.0.0.0:port`.
    ///
    /// `on_ready` runs once the listener accepts connections, with the
    /// bound address.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound or the server never
    /// becomes reachable.
    pub fn listen<F>(&self, port: u16, on_ready: F) -> io::Result<ServerHandle>
    where
        F: FnOnce(SocketAddr),
    {
        self.listen_on((Ipv4Addr::UNSPECIFIED, port), on_ready)
    }

    /// Serve on an explicit address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the server never
    /// becomes reachable.
    pub fn listen_on<A, F>(&self, addr: A, on_ready: F) -> io::Result<ServerHandle>
    where
        A: ToSocketAddrs,
        F: FnOnce(SocketAddr),
    {
        let handle = HttpServer(self.service()).start(addr)?;
        handle.wait_ready()?;
        on_ready(handle.addr());
        Ok(handle)
    }
}
