//! # Runtime Configuration
//!
//! Environment variable configuration for the coroutine runtime.
//!
//! ## Environment Variables
//!
//! ### `TRELLIS_STACK_SIZE`
//!
//! Stack size for request handler coroutines, in decimal (`16384`) or
//! hexadecimal (`0x4000`). Default: `0x4000` (16 KB). Total memory is
//! roughly `stack_size x concurrent_coroutines`, so tune it to handler
//! depth rather than leaving headroom everywhere.
//!
//! The serve port is not configured here; `trellis serve` reads `--port`
//! or `TRELLIS_PORT` through the CLI.
//!
//! ## Usage
//!
//! ```rust
//! use trellis::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Stack size: {} bytes", config.stack_size);
//! ```

use std::env;

/// Runtime configuration loaded from environment variables.
///
/// Load this at startup with [`RuntimeConfig::from_env()`] before spawning
/// any coroutines; stack size only applies to coroutines created after it
/// is set.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes (default: 16 KB / 0x4000).
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults on missing or unparseable values.
    #[must_use]
    pub fn from_env() -> Self {
        let stack_size = match env::var("TRELLIS_STACK_SIZE") {
            Ok(val) => parse_stack_size(&val).unwrap_or(0x4000),
            Err(_) => 0x4000,
        };
        RuntimeConfig { stack_size }
    }
}

fn parse_stack_size(val: &str) -> Option<usize> {
    if let Some(hex) = val.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}
