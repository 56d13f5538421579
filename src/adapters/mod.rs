//! Adapters module — front-ends that drive the agent loop.
//!
//! - **CLI** — interactive REPL and single-message mode

pub mod cli;

pub use cli::CliChannel;
