use crate::parser::Rule;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop an ABI source from turning into a `ContractInterface`.
/// Line numbers are 0-based.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("parser error: Expected \":\" at line {line}")]
    MissingColon { line: usize },

    #[error("parser error: No such token \"{token}\" available at line {line}, try \"name\" or \"implements\" instead")]
    UnknownAttribute { token: String, line: usize },

    #[error("parser error: Invalid formatting at line {line}, \"name\" or \"implements\" should be in the following format: :name=YourNameHere, :implements=YourImplementationHere")]
    MalformedAttribute { line: usize },

    #[error("attempted to declare multiple names for contract {existing} at line {line}; only one contract name allowed per instance")]
    DuplicateName { existing: String, line: usize },

    #[error("parser error: unexpected multiple \"->\"s in function signature at line {line}")]
    MultipleSeparators { line: usize },

    #[error("parser error: missing \"->\" in function signature at line {line}")]
    MissingSeparator { line: usize },

    #[error("parser error: No function name defined in the function signature at line {line}")]
    MissingFunctionName { line: usize },

    #[error("parser error: numerous fn declarations in one function signature at line {line}")]
    MultipleFunctionNames { line: usize },

    #[error("parser error: unsupported modifier \"{modifier}\" at line {line}, only \"payable\" is available")]
    UnknownModifier { modifier: String, line: usize },

    #[error("parser error: more modifiers called than currently supported at line {line}")]
    TooManyModifiers { line: usize },

    #[error("parser error: \"void\" must be the only component on its side of \"->\" at line {line}")]
    MisplacedVoid { line: usize },

    #[error("parser error: Invalid formatting of component \"{token}\" at line {line}: needs to be formatted as name:type")]
    MalformedParameter { token: String, line: usize },

    #[error("parser error: Invalid type requested at line {line}, valid types include: uint8-64, int8-64, uniaddress and arrays of those: received {token}")]
    InvalidType { token: String, line: usize },

    #[error("parser error: Invalid formatting of interface location \"{value}\" at line {line}: should be formatted as Name or \"(myUrl/located/here.com)\"")]
    InvalidReference { value: String, line: usize },

    #[error("scheme \"{scheme}\" is not supported for interface locations, use http or https")]
    UnsupportedScheme { scheme: String },

    #[error("cyclic implements: {location} is already being resolved")]
    CyclicImplements { location: String },

    #[error("no contract name declared, add a \":name=YourNameHere\" line")]
    MissingName,

    #[error("could not read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("could not fetch {url}: {source}")]
    Fetch {
        url: String,
        source: Box<ureq::Error>,
    },

    #[error("could not read response from {url}: {source}")]
    FetchBody { url: String, source: io::Error },

    #[error("invalid interface url {url}: {source}")]
    Url { url: String, source: url::ParseError },

    #[error("in interface {location}: {source}")]
    Interface {
        location: String,
        source: Box<ParseError>,
    },

    #[error("{0}")]
    Grammar(#[from] Box<pest::error::Error<Rule>>),
}

impl ParseError {
    /// The innermost error, looking through interface wrappers.
    pub fn root_cause(&self) -> &ParseError {
        match self {
            ParseError::Interface { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Failures while turning a `ContractInterface` into C text.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("\"{name}\" is not a valid C identifier")]
    InvalidIdentifier { name: String },

    #[error("\"{name}\" is reserved by the generated code")]
    ReservedIdentifier { name: String },

    #[error("parameter \"{name}\" is declared more than once in function {function}")]
    DuplicateParameter { function: String, name: String },

    #[error("function \"{name}\" is declared more than once in contract {contract}")]
    DuplicateFunction { contract: String, name: String },

    #[error("language \"{0}\" is not supported, select one of: c")]
    UnsupportedLanguage(String),

    #[error("formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}
