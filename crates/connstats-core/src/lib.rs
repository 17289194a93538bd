//! Core domain layer for connstats.
//!
//! Defines the connection record model, the teardown-line parser, the
//! record validator, file-date resolution and the shared error and
//! settings types used by the data and runtime crates.

pub mod error;
pub mod filedate;
pub mod models;
pub mod parser;
pub mod settings;
pub mod validator;
