//! Java frontend - parse Java source to the structural IR

pub mod errors;
pub mod lexer;
mod parser;

pub use parser::parse_java;
