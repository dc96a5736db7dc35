pub mod ast;
pub mod fragments;
pub mod selector;

pub use ast::{AbiType, BaseType, ContractInterface, Function, Parameter};
pub use fragments::SignatureStyle;
pub use selector::{canonical_signature, function_selector, Selector};
