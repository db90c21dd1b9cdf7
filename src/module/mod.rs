//! # Module Descriptors & Resolver
//!
//! Declares the descriptor tree the engine composes routes from and the
//! resolver that walks it.
//!
//! A [`Module`] carries a path segment, the components it exports, and the
//! child modules it imports. Components declare their methods through
//! [`ComponentBuilder`]; everything a method needs at request time (verb,
//! trailing path segment, response defaults) is expressed as metadata
//! records that the resolver copies into the [`MetadataStore`] before any
//! route is compiled.
//!
//! ## Example
//!
//! ```
//! use http::Method;
//! use trellis::{App, ComponentBuilder, HandlerRequest, Module, Reply};
//!
//! struct Health;
//!
//! impl Health {
//!     fn check(&self, _req: &HandlerRequest, reply: &mut Reply) -> anyhow::Result<()> {
//!         reply.body(serde_json::json!({ "status": "ok" }));
//!         Ok(())
//!     }
//! }
//!
//! let probes = ComponentBuilder::new("probes", || Health)
//!     .route("check", Method::GET, "live", Health::check)
//!     .build();
//!
//! let root = Module::builder().path("status").export(probes).build();
//! let app = App::build(&root);
//! assert_eq!(app.routes().len(), 1);
//! ```
//!
//! [`MetadataStore`]: crate::metadata::MetadataStore

mod descriptor;
mod resolver;

pub use descriptor::{BoundMethod, Component, ComponentBuilder, MethodSpec, Module, ModuleBuilder};
pub use resolver::ModuleResolver;
