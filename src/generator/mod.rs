use crate::abi::{function_selector, ContractInterface, Function, SignatureStyle};
use crate::error::RenderError;
use std::collections::HashSet;
use std::fmt::Write;
use std::str::FromStr;

/// C keywords, plus the locals the generated bodies declare next to the parameters.
const RESERVED: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "r", "fn",
];

/// Target language of the generated sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
}

impl FromStr for Language {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(Language::C),
            other => Err(RenderError::UnsupportedLanguage(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    EncodeSource,
    EncodeHeader,
    DecodeSource,
    DecodeHeader,
}

impl ArtifactKind {
    pub const ENCODE: [ArtifactKind; 2] = [ArtifactKind::EncodeSource, ArtifactKind::EncodeHeader];
    pub const DECODE: [ArtifactKind; 2] = [ArtifactKind::DecodeSource, ArtifactKind::DecodeHeader];

    /// File name of the artifact for `contract_name`, e.g. `TokenABI.c`.
    pub fn file_name(&self, contract_name: &str) -> String {
        match self {
            ArtifactKind::EncodeSource => format!("{}ABI.c", contract_name),
            ArtifactKind::EncodeHeader => format!("{}ABI.h", contract_name),
            ArtifactKind::DecodeSource => format!("{}Dispatcher.c", contract_name),
            ArtifactKind::DecodeHeader => format!("{}Dispatcher.h", contract_name),
        }
    }

    fn is_encode(&self) -> bool {
        matches!(self, ArtifactKind::EncodeSource | ArtifactKind::EncodeHeader)
    }

    fn header(&self) -> ArtifactKind {
        if self.is_encode() {
            ArtifactKind::EncodeHeader
        } else {
            ArtifactKind::DecodeHeader
        }
    }
}

/// A rendered artifact ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub contents: String,
}

/// Renders every artifact in `kinds`. Nothing is returned unless all succeed.
pub fn generate_all(
    contract: &ContractInterface,
    kinds: &[ArtifactKind],
) -> Result<Vec<Artifact>, RenderError> {
    kinds
        .iter()
        .map(|&kind| {
            Ok(Artifact {
                kind,
                file_name: kind.file_name(&contract.name),
                contents: generate(contract, kind)?,
            })
        })
        .collect()
}

pub fn generate(contract: &ContractInterface, kind: ArtifactKind) -> Result<String, RenderError> {
    validate(contract)?;

    let mut output = String::new();
    let side = if kind.is_encode() {
        "caller-side ABI"
    } else {
        "callee-side dispatcher"
    };
    writeln!(output, "// Contract: {}", contract.name)?;
    writeln!(output, "// Auto-generated {} from SimpleABI source", side)?;
    writeln!(output)?;

    match kind {
        ArtifactKind::EncodeSource => generate_encode_source(&mut output, contract)?,
        ArtifactKind::DecodeSource => generate_decode_source(&mut output, contract)?,
        ArtifactKind::EncodeHeader | ArtifactKind::DecodeHeader => {
            generate_header(&mut output, contract, kind)?
        }
    }
    Ok(output)
}

fn generate_encode_source(output: &mut String, contract: &ContractInterface) -> Result<(), RenderError> {
    write_includes(output, contract, ArtifactKind::EncodeSource)?;

    for function in &contract.functions {
        writeln!(
            output,
            "QtumCallResult {}{{",
            function.c_signature(&contract.name, SignatureStyle::Encode)
        )?;
        for line in function.call_body(&contract.name) {
            writeln!(output, "\t{}", line)?;
        }
        writeln!(output, "}}")?;
        writeln!(output)?;
    }
    Ok(())
}

fn generate_decode_source(output: &mut String, contract: &ContractInterface) -> Result<(), RenderError> {
    write_includes(output, contract, ArtifactKind::DecodeSource)?;

    writeln!(output, "void dispatch(){{")?;
    writeln!(output, "\tuint32_t fn;")?;
    writeln!(output, "\tif(qtumPop(&fn, sizeof(fn)) != sizeof(fn)){{")?;
    writeln!(output, "\t\tqtumError(\"missing function selector\");")?;
    writeln!(output, "\t}}")?;
    writeln!(output, "\tswitch(fn){{")?;
    for function in &contract.functions {
        writeln!(output, "\t\tcase {}:", function.id_macro(&contract.name))?;
        writeln!(output, "\t\t{{")?;
        for line in function.dispatch_body(&contract.name) {
            writeln!(output, "\t\t\t{}", line)?;
        }
        writeln!(output, "\t\t}}")?;
    }
    writeln!(output, "\t\tdefault:")?;
    writeln!(output, "\t\t\tqtumError(\"no function matches the selector\");")?;
    writeln!(output, "\t}}")?;
    writeln!(output, "}}")?;
    Ok(())
}

fn generate_header(
    output: &mut String,
    contract: &ContractInterface,
    kind: ArtifactKind,
) -> Result<(), RenderError> {
    let guard = include_guard(&contract.name, kind);
    writeln!(output, "#ifndef {}", guard)?;
    writeln!(output, "#define {}", guard)?;
    writeln!(output)?;
    writeln!(output, "#include <stdlib.h>")?;
    writeln!(output, "#include <qtum.h>")?;
    writeln!(output)?;

    // Composed interfaces share functions, so every ID may already be defined.
    writeln!(output, "//Function IDs")?;
    for function in &contract.functions {
        let id = function.id_macro(&contract.name);
        writeln!(output, "#ifndef {}", id)?;
        writeln!(output, "#define {} {}", id, function_selector(&contract.name, function))?;
        writeln!(output, "#endif")?;
    }
    writeln!(output)?;

    writeln!(output, "//prototypes")?;
    for function in &contract.functions {
        writeln!(output, "{};", prototype(&contract.name, function, kind))?;
    }
    if kind == ArtifactKind::DecodeHeader {
        writeln!(output, "void dispatch(void);")?;
    }
    writeln!(output)?;
    writeln!(output, "#endif")?;
    Ok(())
}

fn write_includes(
    output: &mut String,
    contract: &ContractInterface,
    kind: ArtifactKind,
) -> Result<(), RenderError> {
    writeln!(output, "#include <stdlib.h>")?;
    writeln!(output, "#include <qtum.h>")?;
    writeln!(output, "#include \"{}\"", kind.header().file_name(&contract.name))?;
    writeln!(output)?;
    Ok(())
}

fn prototype(contract_name: &str, function: &Function, kind: ArtifactKind) -> String {
    if kind.is_encode() {
        format!(
            "QtumCallResult {}",
            function.c_signature(contract_name, SignatureStyle::Encode)
        )
    } else {
        format!(
            "void {}",
            function.c_signature(contract_name, SignatureStyle::Prototype)
        )
    }
}

fn include_guard(contract_name: &str, kind: ArtifactKind) -> String {
    let suffix = if kind.is_encode() { "ABI_H" } else { "DISPATCHER_H" };
    format!("{}_{}", contract_name.to_uppercase(), suffix)
}

/// Rejects names that would not compile or would collide once rendered.
fn validate(contract: &ContractInterface) -> Result<(), RenderError> {
    check_identifier(&contract.name)?;

    let mut functions = HashSet::new();
    for function in &contract.functions {
        check_identifier(&function.name)?;
        if !functions.insert(function.name.as_str()) {
            return Err(RenderError::DuplicateFunction {
                contract: contract.name.clone(),
                name: function.name.clone(),
            });
        }

        let mut locals: HashSet<String> = HashSet::new();
        for param in function.inputs.iter().chain(&function.outputs) {
            check_identifier(&param.name)?;
            if RESERVED.contains(&param.name.as_str()) {
                return Err(RenderError::ReservedIdentifier {
                    name: param.name.clone(),
                });
            }
            let mut declared = vec![param.name.clone()];
            if param.ty.is_array() {
                declared.push(format!("{}_sz", param.name));
            }
            for name in declared {
                if !locals.insert(name.clone()) {
                    return Err(RenderError::DuplicateParameter {
                        function: function.name.clone(),
                        name,
                    });
                }
            }
        }
    }
    Ok(())
}

fn check_identifier(name: &str) -> Result<(), RenderError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if !valid {
        return Err(RenderError::InvalidIdentifier {
            name: name.to_string(),
        });
    }
    if name.starts_with("__") {
        return Err(RenderError::ReservedIdentifier {
            name: name.to_string(),
        });
    }
    Ok(())
}
