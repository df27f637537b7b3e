//! Structured logging to a rolling JSON file.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → EnvFilter → fmt JSON layer → non-blocking writer → daily file
//! ```
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in the configuration file or `ROSTER_TRACE_LEVEL`
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup

mod init;

pub use init::init_tracing;
