//! tooloop - minimal local-model agent loop
//!
//! This library provides a chat loop against a local Ollama model, with
//! tools described to the model through schemas derived from their
//! declared parameters and dispatched through a validating, coercing
//! dispatcher.

pub mod adapters;
pub mod agent;
pub mod config;
pub mod error;
pub mod tools;
pub mod ui;

pub use error::{Error, Result};
