//! Python target for jport
//!
//! - [`mapper`]: structural IR → mapped IR (types, names, modifiers)
//! - [`backend`]: mapped IR → Python declaration text
//! - [`reader`]: Python text → declaration outline
//! - [`validator`]: generated text checked against the mapped IR

pub mod backend;
pub mod mapper;
pub mod reader;
pub mod validator;

pub use backend::{GeneratedCode, GeneratorOptions, generate};
pub use mapper::{Mapper, MapperPolicy, Mapping, map};
pub use validator::{ValidatorOptions, validate};
