//! # Trellis
//!
//! **Trellis** is a declarative route composition engine for Rust services,
//! powered by the `may` coroutine runtime.
//!
//! ## Overview
//!
//! Applications are declared as a tree of module descriptors. Each module
//! contributes a path segment, exports request-handling components, and
//! imports child modules. At bootstrap the tree is walked exactly once:
//! component metadata lands in a metadata store, eligible methods compile
//! into a flattened route table, and an HTTP facade serves that table.
//! After bootstrap nothing registers, so request handling is lock-free
//! reads over immutable structures.
//!
//! ## Architecture
//!
//! - **[`metadata`]** - class-scope and method-scope records with
//!   fallback reads; the registry every routing decision is read from
//! - **[`module`]** - component and module descriptors plus the resolver
//!   that walks the tree
//! - **[`compiler`]** - turns exported components into registered routes
//!   by reading verb and sub-path records
//! - **[`router`]** - the flattened route table, matched by exact verb
//!   and path
//! - **[`adapter`]** - wraps bound component methods into route handlers
//!   and seeds replies with metadata defaults
//! - **[`server`]** - HTTP facade built on `may_minihttp`: parsing,
//!   dispatch, response writing, built-in `/health` and `/metrics`
//! - **[`middleware`]** - before/after hooks around matched routes
//!   (tracing, metrics)
//! - **[`bootstrap`]** - [`App`]: compile a module tree and serve it
//! - **[`cli`]** / **[`demo`]** - the runnable demo application
//!
//! ## Quick Start
//!
//! ```no_run
//! use http::Method;
//! use trellis::{App, ComponentBuilder, Module};
//!
//! let cats = ComponentBuilder::new("cats", || ())
//!     .route("list", Method::GET, "", |_, _req, reply| {
//!         reply.body(serde_json::json!(["felix", "tom"]));
//!         Ok(())
//!     })
//!     .build();
//!
//! let root = Module::builder()
//!     .path("api")
//!     .import(Module::builder().path("cats").export(cats).build())
//!     .build();
//!
//! let app = App::build(&root);
//! assert!(app.routes().lookup(&Method::GET, "/api/cats").is_some());
//!
//! let handle = app.listen(3000, |addr| println!("listening on {addr}"))?;
//! handle.join().ok();
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ## Request Flow
//!
//! The facade parses the raw request, probes the route table, and runs the
//! middleware chain around the matched handler. Handlers receive a
//! [`HandlerRequest`] and write into a [`Reply`] that starts out seeded
//! with the method's recorded response defaults. A handler error becomes a
//! 500; an unmatched path falls through to the built-in endpoints and then
//! to a JSON 404.
//!
//! ## Runtime Considerations
//!
//! Trellis uses the `may` coroutine runtime, not tokio or async-std:
//!
//! - Handlers run in coroutines (lightweight threads)
//! - Stack size is configurable via the `TRELLIS_STACK_SIZE` environment
//!   variable
//! - The runtime is incompatible with tokio-based libraries without
//!   bridging
//! - Blocking operations should use `may`'s blocking facilities

pub mod adapter;
pub mod bootstrap;
pub mod cli;
pub mod compiler;
pub mod demo;
pub mod ids;
pub mod metadata;
pub mod middleware;
pub mod module;
pub mod paths;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use adapter::{HandlerRequest, Reply, RouteHandler};
pub use bootstrap::App;
pub use ids::RequestId;
pub use metadata::MetadataStore;
pub use module::{
    BoundMethod, Component, ComponentBuilder, MethodSpec, Module, ModuleBuilder, ModuleResolver,
};
pub use router::{RegisteredRoute, RouteTable};
