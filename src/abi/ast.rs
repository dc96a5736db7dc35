use std::fmt;
use std::str::FromStr;

/// Element types a parameter can carry on the contract stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Address,
}

impl BaseType {
    pub const ALL: [BaseType; 9] = [
        BaseType::Uint8,
        BaseType::Uint16,
        BaseType::Uint32,
        BaseType::Uint64,
        BaseType::Int8,
        BaseType::Int16,
        BaseType::Int32,
        BaseType::Int64,
        BaseType::Address,
    ];

    /// Name used in ABI source and in the canonical selector signature.
    pub fn abi_name(&self) -> &'static str {
        match self {
            BaseType::Uint8 => "uint8",
            BaseType::Uint16 => "uint16",
            BaseType::Uint32 => "uint32",
            BaseType::Uint64 => "uint64",
            BaseType::Int8 => "int8",
            BaseType::Int16 => "int16",
            BaseType::Int32 => "int32",
            BaseType::Int64 => "int64",
            BaseType::Address => "uniaddress",
        }
    }

    /// Name of the C type holding one element.
    pub fn c_name(&self) -> &'static str {
        match self {
            BaseType::Uint8 => "uint8_t",
            BaseType::Uint16 => "uint16_t",
            BaseType::Uint32 => "uint32_t",
            BaseType::Uint64 => "uint64_t",
            BaseType::Int8 => "int8_t",
            BaseType::Int16 => "int16_t",
            BaseType::Int32 => "int32_t",
            BaseType::Int64 => "int64_t",
            BaseType::Address => "UniversalAddressABI",
        }
    }
}

impl FromStr for BaseType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaseType::ALL
            .iter()
            .copied()
            .find(|base| base.abi_name() == s)
            .ok_or(())
    }
}

/// A parameter type: a single element or a flat array of elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiType {
    Base(BaseType),
    Array(BaseType),
}

impl AbiType {
    pub fn base(&self) -> BaseType {
        match self {
            AbiType::Base(base) | AbiType::Array(base) => *base,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, AbiType::Array(_))
    }

    pub fn is_address(&self) -> bool {
        matches!(self, AbiType::Base(BaseType::Address))
    }
}

impl FromStr for AbiType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_suffix("[]") {
            Some(element) => element.parse().map(AbiType::Array),
            None => s.parse().map(AbiType::Base),
        }
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Base(base) => write!(f, "{}", base.abi_name()),
            AbiType::Array(base) => write!(f, "{}[]", base.abi_name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: AbiType,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: AbiType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<Parameter>,
    pub outputs: Vec<Parameter>,
    pub payable: bool,
}

/// Renders the function back into a single ABI source line.
impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.inputs {
            write!(f, "{} ", input)?;
        }
        write!(f, "{}:fn", self.name)?;
        if self.payable {
            write!(f, ":payable")?;
        }
        write!(f, " ->")?;
        if self.outputs.is_empty() {
            return write!(f, " void");
        }
        for output in &self.outputs {
            write!(f, " {}", output)?;
        }
        Ok(())
    }
}

/// The resolved interface handed from the parser to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractInterface {
    pub name: String,
    pub functions: Vec<Function>,
}

impl ContractInterface {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name == name)
    }
}
