//! # CLI Module
//!
//! Command-line entry points for running the built-in demo application.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Compile the demo module tree and serve it:
//!
//! ```bash
//! trellis serve --port 3000
//! ```
//!
//! The port can also come from the `TRELLIS_PORT` environment variable;
//! an explicit `--port` wins.
//!
//! ### `routes`
//!
//! Print the route table the demo module tree compiles to, without
//! starting a server:
//!
//! ```bash
//! trellis routes
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands};
