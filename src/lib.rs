//! lanchat is a full-screen terminal client for an AI chat backend on the
//! local network.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] defines the backend's wire types and the [`api::gateway`] that
//!   talks to it.
//! - [`core`] owns the chat state machine, the send flow, stream assembly,
//!   reply post-processing and configuration.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`cli`] parses arguments and runs the one-shot subcommands.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
