//! Logger setup for applications embedding the form engine.
//!
//! The library itself only talks to the `log` facade; call [`init_logging`]
//! from a binary to get output.

mod init;

pub use init::{init_logging, LoggingConfig};
