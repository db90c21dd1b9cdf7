//! # Route Table
//!
//! The flattened routing surface the module tree compiles into. Unlike
//! pattern routers, the table is a plain verb+path map: every route path is
//! fully known at bootstrap, so matching is an exact probe with no regex,
//! parameters, or precedence rules.
//!
//! Collisions are allowed by design. A registration landing on an occupied
//! verb+path replaces the earlier route (with a warning naming both), which
//! is what makes declaration order in the module tree meaningful: parents
//! register before their imports, and a later import can deliberately
//! shadow an earlier route.

mod core;

pub use self::core::{RegisteredRoute, RouteTable};
