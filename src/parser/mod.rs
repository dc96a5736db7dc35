use pest::Parser;
use pest_derive::Parser;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};
use crate::abi::{AbiType, ContractInterface, Function, Parameter};
use crate::error::ParseError;

pub mod resolve;

pub use resolve::{DefaultLoader, InterfaceRef, Location, SourceLoader};

const VOID: &str = "void";

#[derive(Parser)]
#[grammar = "parser/abi.pest"]
pub struct AbiParser;

/// What a single line of ABI source declares.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Comment,
    Name(String),
    Implements(Vec<InterfaceRef>),
    Function(Function),
}

/// Parses a complete ABI source. `:implements` references are resolved
/// relative to the current directory.
pub fn parse(source: &str) -> Result<ContractInterface, ParseError> {
    InterfaceParser::new().parse_source(source, None)
}

/// Parses an ABI file. A file without a `:name` line is named after its stem.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ContractInterface, ParseError> {
    InterfaceParser::new().parse_file(path)
}

/// Classifies and parses one line; `line` is its 0-based number, used in errors.
pub fn parse_line(input: &str, line: usize) -> Result<Line, ParseError> {
    let input = input.trim();
    if input.is_empty() || input.starts_with('#') {
        return Ok(Line::Comment);
    }
    if input.contains(char::is_whitespace) {
        return parse_function(input, line).map(Line::Function);
    }
    parse_attribute(input, line)
}

fn parse_attribute(input: &str, line: usize) -> Result<Line, ParseError> {
    let body = input
        .strip_prefix(':')
        .ok_or(ParseError::MissingColon { line })?;

    let key_end = body.find(|c: char| c == ':' || c == '=').unwrap_or(body.len());
    let key = &body[..key_end];
    if key != "name" && key != "implements" {
        return Err(ParseError::UnknownAttribute {
            token: key.to_string(),
            line,
        });
    }

    let value = match body[key_end..].strip_prefix('=') {
        Some(value) if !value.is_empty() => value,
        _ => return Err(ParseError::MalformedAttribute { line }),
    };

    if key == "name" {
        if value.contains(|c: char| c == ':' || c == '=') {
            return Err(ParseError::MalformedAttribute { line });
        }
        Ok(Line::Name(value.to_string()))
    } else {
        parse_references(value, line).map(Line::Implements)
    }
}

fn parse_references(value: &str, line: usize) -> Result<Vec<InterfaceRef>, ParseError> {
    let pairs = AbiParser::parse(Rule::references, value).map_err(|_| {
        ParseError::InvalidReference {
            value: value.to_string(),
            line,
        }
    })?;

    let mut references = Vec::new();
    for pair in pairs.flat_map(|pair| pair.into_inner()) {
        match pair.as_rule() {
            Rule::located_ref => {
                if let Some(locator) = pair.into_inner().next() {
                    references.push(InterfaceRef::Located(locator.as_str().to_string()));
                }
            }
            Rule::bare_ref => references.push(InterfaceRef::Bare(pair.as_str().to_string())),
            _ => {}
        }
    }
    Ok(references)
}

fn parse_function(input: &str, line: usize) -> Result<Function, ParseError> {
    let pairs = AbiParser::parse(Rule::signature, input).map_err(Box::new)?;

    let mut sides: Vec<Vec<&str>> = Vec::new();
    for pair in pairs.flat_map(|pair| pair.into_inner()) {
        if pair.as_rule() == Rule::side {
            sides.push(pair.into_inner().map(|component| component.as_str()).collect());
        }
    }

    let mut sides = sides.into_iter();
    let (left, right) = match (sides.next(), sides.next(), sides.next()) {
        (Some(left), Some(right), None) => (left, right),
        (_, _, Some(_)) => return Err(ParseError::MultipleSeparators { line }),
        _ => return Err(ParseError::MissingSeparator { line }),
    };

    let (name, payable, left) = split_function_name(left, line)?;
    let inputs = gather_parameters(left, line)?;
    let outputs = gather_parameters(right, line)?;

    Ok(Function {
        name,
        inputs,
        outputs,
        payable,
    })
}

/// Pulls the `name:fn[:payable]` component out of the input side.
fn split_function_name(
    components: Vec<&str>,
    line: usize,
) -> Result<(String, bool, Vec<&str>), ParseError> {
    let mut declared: Option<(String, bool)> = None;
    let mut rest = Vec::new();

    for component in components {
        let mut fields = component.split(':');
        let name = fields.next().unwrap_or_default();
        if fields.next() != Some("fn") {
            rest.push(component);
            continue;
        }
        if declared.is_some() {
            return Err(ParseError::MultipleFunctionNames { line });
        }
        let modifiers: Vec<&str> = fields.collect();
        let payable = match modifiers.as_slice() {
            [] => false,
            ["payable"] => true,
            [modifier] => {
                return Err(ParseError::UnknownModifier {
                    modifier: modifier.to_string(),
                    line,
                })
            }
            _ => return Err(ParseError::TooManyModifiers { line }),
        };
        declared = Some((name.to_string(), payable));
    }

    match declared {
        Some((name, payable)) if !name.is_empty() => Ok((name, payable, rest)),
        _ => Err(ParseError::MissingFunctionName { line }),
    }
}

fn gather_parameters(components: Vec<&str>, line: usize) -> Result<Vec<Parameter>, ParseError> {
    if components.contains(&VOID) {
        return match components.len() {
            1 => Ok(Vec::new()),
            _ => Err(ParseError::MisplacedVoid { line }),
        };
    }
    components
        .into_iter()
        .map(|component| parse_parameter(component, line))
        .collect()
}

fn parse_parameter(component: &str, line: usize) -> Result<Parameter, ParseError> {
    let fields: Vec<&str> = component.split(':').collect();
    match fields.as_slice() {
        [name, ty] if !name.is_empty() => {
            let ty: AbiType = ty.parse().map_err(|_| ParseError::InvalidType {
                token: ty.to_string(),
                line,
            })?;
            Ok(Parameter::new(*name, ty))
        }
        _ => Err(ParseError::MalformedParameter {
            token: component.to_string(),
            line,
        }),
    }
}

/// A parsed source before the top-level name requirement is applied.
struct Draft {
    name: Option<String>,
    functions: Vec<Function>,
}

/// Parses ABI sources, following `:implements` references through a `SourceLoader`.
pub struct InterfaceParser<L = DefaultLoader> {
    loader: L,
    resolving: Vec<Location>,
}

impl InterfaceParser<DefaultLoader> {
    pub fn new() -> Self {
        Self::with_loader(DefaultLoader::default())
    }
}

impl Default for InterfaceParser<DefaultLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: SourceLoader> InterfaceParser<L> {
    pub fn with_loader(loader: L) -> Self {
        Self {
            loader,
            resolving: Vec::new(),
        }
    }

    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<ContractInterface, ParseError> {
        self.parse_location(Location::file(path))
    }

    pub fn parse_location(&mut self, location: Location) -> Result<ContractInterface, ParseError> {
        let draft = self.load(&location)?;
        let name = draft
            .name
            .or_else(|| location.stem())
            .ok_or(ParseError::MissingName)?;
        Ok(ContractInterface {
            name,
            functions: draft.functions,
        })
    }

    /// Parses `source` as if it had been loaded from `origin`.
    pub fn parse_source(
        &mut self,
        source: &str,
        origin: Option<&Location>,
    ) -> Result<ContractInterface, ParseError> {
        let draft = self.parse_draft(source, origin)?;
        Ok(ContractInterface {
            name: draft.name.ok_or(ParseError::MissingName)?,
            functions: draft.functions,
        })
    }

    fn load(&mut self, location: &Location) -> Result<Draft, ParseError> {
        if self.resolving.contains(location) {
            return Err(ParseError::CyclicImplements {
                location: location.to_string(),
            });
        }
        let source = self.loader.load(location)?;

        self.resolving.push(location.clone());
        let draft = self.parse_draft(&source, Some(location));
        self.resolving.pop();
        draft
    }

    fn parse_draft(&mut self, source: &str, origin: Option<&Location>) -> Result<Draft, ParseError> {
        let mut name: Option<String> = None;
        let mut functions = Vec::new();
        let mut implemented = Vec::new();

        for (number, text) in source.lines().enumerate() {
            match parse_line(text, number)? {
                Line::Comment => {}
                Line::Name(declared) => {
                    if let Some(existing) = name {
                        return Err(ParseError::DuplicateName {
                            existing,
                            line: number,
                        });
                    }
                    debug!(name = %declared, "found contract name");
                    name = Some(declared);
                }
                Line::Function(function) => {
                    debug!(function = %function.name, "found function");
                    functions.push(function);
                }
                Line::Implements(references) => {
                    for reference in references {
                        let location = reference.resolve(origin)?;
                        debug!(%location, "resolving implemented interface");
                        let draft = self.load(&location).map_err(|source| {
                            ParseError::Interface {
                                location: location.to_string(),
                                source: Box::new(source),
                            }
                        })?;
                        implemented.extend(draft.functions);
                    }
                }
            }
        }

        Ok(Draft {
            name,
            functions: merge_functions(functions.into_iter().chain(implemented)),
        })
    }
}

/// Keeps the first function of every name, in encounter order.
fn merge_functions(functions: impl IntoIterator<Item = Function>) -> Vec<Function> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for function in functions {
        if seen.insert(function.name.clone()) {
            merged.push(function);
        } else {
            warn!(function = %function.name, "dropping duplicate function definition, the first one wins");
        }
    }
    merged
}
