pub mod abi;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod parser;

pub use abi::{ContractInterface, Function, Parameter};
pub use error::{ParseError, RenderError};
pub use generator::{generate, generate_all, ArtifactKind};
pub use parser::{parse, parse_file};

#[cfg(test)]
mod tests;
