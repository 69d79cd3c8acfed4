//! Java frontend for jport
//!
//! Turns Java source text into a [`jport_core::StructuralIr`]. Only
//! declarations are modelled; method and constructor bodies are kept as
//! opaque source text.

pub mod frontend;

pub use frontend::parse_java;

pub type Result<T> = std::result::Result<T, jport_core::SyntaxError>;
