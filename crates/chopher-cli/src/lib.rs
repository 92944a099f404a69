//! Chopher CLI library.
//!
//! Argument definitions, runtime settings, the file and seed commands, and the
//! upload server behind the `chopher` binary.

pub mod cli_args;
pub mod commands;
pub mod config;
pub mod server;
