//! Per-function C fragments the generator stitches into its skeletons.
//!
//! Body builders return one string per line. Nesting inside a body is
//! expressed with leading tabs; the generator adds the indentation of the
//! surrounding block.

use super::ast::{AbiType, BaseType, Function, Parameter};

const ADDRESS_STRUCT: &str = "UniversalAddressABI";

/// Runtime calls that move one value on or off the contract stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackPrimitives {
    pub push: &'static str,
    pub pop: &'static str,
}

/// The one table both the caller and the dispatcher builders read from.
pub fn stack_primitives(ty: AbiType) -> StackPrimitives {
    let (push, pop) = match ty {
        AbiType::Base(BaseType::Uint8 | BaseType::Int8) => ("qtumPush8", "qtumPop8"),
        AbiType::Base(BaseType::Uint16 | BaseType::Int16) => ("qtumPush16", "qtumPop16"),
        AbiType::Base(BaseType::Uint32 | BaseType::Int32) => ("qtumPush32", "qtumPop32"),
        AbiType::Base(BaseType::Uint64 | BaseType::Int64) => ("qtumPush64", "qtumPop64"),
        AbiType::Base(BaseType::Address) => ("qtumPush", "qtumPopExact"),
        AbiType::Array(_) => ("qtumPush", "qtumPop"),
    };
    StackPrimitives { push, pop }
}

/// How a function's parameter list is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureStyle {
    /// Caller-side definition, prefixed with the `__address`/`__options` pair.
    Encode,
    /// Prototype of the implementation the dispatcher calls.
    Prototype,
    /// Arguments of the dispatcher's call, outputs passed by reference.
    Invocation,
}

impl Parameter {
    fn input_declarations(&self) -> Vec<String> {
        let name = &self.name;
        match self.ty {
            AbiType::Array(base) => vec![
                format!("{}* {}", base.c_name(), name),
                format!("size_t {}_sz", name),
            ],
            AbiType::Base(BaseType::Address) => vec![format!("{}* {}", ADDRESS_STRUCT, name)],
            AbiType::Base(base) => vec![format!("{} {}", base.c_name(), name)],
        }
    }

    fn output_declarations(&self) -> Vec<String> {
        let name = &self.name;
        match self.ty {
            AbiType::Array(base) => vec![
                format!("{}** {}", base.c_name(), name),
                format!("size_t* {}_sz", name),
            ],
            AbiType::Base(BaseType::Address) => vec![format!("{}** {}", ADDRESS_STRUCT, name)],
            AbiType::Base(base) => vec![format!("{}* {}", base.c_name(), name)],
        }
    }

    fn input_arguments(&self) -> Vec<String> {
        if self.ty.is_array() {
            vec![self.name.clone(), format!("{}_sz", self.name)]
        } else {
            vec![self.name.clone()]
        }
    }

    fn output_arguments(&self) -> Vec<String> {
        if self.ty.is_array() {
            vec![format!("&{}", self.name), format!("&{}_sz", self.name)]
        } else {
            vec![format!("&{}", self.name)]
        }
    }

    /// Statement pushing this value, as seen from a scope where it is held by value.
    fn push_statement(&self) -> String {
        let push = stack_primitives(self.ty).push;
        let name = &self.name;
        match self.ty {
            AbiType::Array(_) => format!("{}({}, {}_sz * sizeof(*{}));", push, name, name, name),
            AbiType::Base(BaseType::Address) => {
                format!("{}({}, sizeof({}));", push, name, ADDRESS_STRUCT)
            }
            AbiType::Base(_) => format!("{}({});", push, name),
        }
    }
}

impl Function {
    /// `ID_<Contract>_<function>`, the macro naming this function's selector.
    pub fn id_macro(&self, contract_name: &str) -> String {
        format!("ID_{}_{}", contract_name, self.name)
    }

    /// `<Contract>_<function>(...)` with the parameter list rendered in `style`.
    pub fn c_signature(&self, contract_name: &str, style: SignatureStyle) -> String {
        let mut params: Vec<String> = Vec::new();
        if style == SignatureStyle::Encode {
            params.push("UniversalAddress* __address".to_string());
            params.push("QtumCallOptions* __options".to_string());
        }
        for input in &self.inputs {
            match style {
                SignatureStyle::Invocation => params.extend(input.input_arguments()),
                _ => params.extend(input.input_declarations()),
            }
        }
        for output in &self.outputs {
            match style {
                SignatureStyle::Invocation => params.extend(output.output_arguments()),
                _ => params.extend(output.output_declarations()),
            }
        }
        if params.is_empty() && style == SignatureStyle::Prototype {
            params.push("void".to_string());
        }
        format!("{}_{}({})", contract_name, self.name, params.join(", "))
    }

    /// Body of the caller-side function: push arguments, call, pop results.
    pub fn call_body(&self, contract_name: &str) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.payable {
            lines.push("if(__options->value > 0) {".to_string());
            lines.push("\tqtumError(\"nonpayable function\");".to_string());
            lines.push("}".to_string());
        }
        for input in &self.inputs {
            lines.push(input.push_statement());
        }
        lines.push(format!(
            "{}({});",
            stack_primitives(AbiType::Base(BaseType::Uint32)).push,
            self.id_macro(contract_name)
        ));
        lines.push("QtumCallResult r = qtumCall(__address, __options);".to_string());
        lines.push("if(r.error == QTUM_CALL_SUCCESS){".to_string());
        // The dispatcher pushed the outputs in order, so the last one is on top.
        for output in self.outputs.iter().rev() {
            lines.extend(
                pop_output_into_pointer(output)
                    .into_iter()
                    .map(|line| format!("\t{}", line)),
            );
        }
        lines.push("}".to_string());
        lines.push("return r;".to_string());
        lines
    }

    /// Body of the dispatcher's `case`: pop arguments, call the implementation,
    /// push results.
    pub fn dispatch_body(&self, contract_name: &str) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.payable {
            lines.push("if(qtumExec->valueSent > 0) {".to_string());
            lines.push("\tqtumError(\"nonpayable function\");".to_string());
            lines.push("}".to_string());
        }
        for input in self.inputs.iter().rev() {
            lines.extend(pop_input_into_local(input));
        }
        for output in &self.outputs {
            let name = &output.name;
            match output.ty {
                AbiType::Array(base) => {
                    lines.push(format!("{}* {} = NULL;", base.c_name(), name));
                    lines.push(format!("size_t {}_sz = 0;", name));
                }
                AbiType::Base(BaseType::Address) => {
                    lines.push(format!("{}* {} = NULL;", ADDRESS_STRUCT, name));
                }
                AbiType::Base(base) => lines.push(format!("{} {} = 0;", base.c_name(), name)),
            }
        }
        lines.push(format!(
            "{};",
            self.c_signature(contract_name, SignatureStyle::Invocation)
        ));
        for output in &self.outputs {
            lines.push(output.push_statement());
        }
        lines.push("break;".to_string());
        lines
    }
}

/// Caller side: `output` is a pointer (or pointer pair) supplied by the user.
fn pop_output_into_pointer(output: &Parameter) -> Vec<String> {
    let pop = stack_primitives(output.ty).pop;
    let name = &output.name;
    match output.ty {
        AbiType::Array(_) => vec![
            format!("*{}_sz = qtumPeekSize();", name),
            format!("*{} = malloc(*{}_sz);", name, name),
            format!("{}(*{}, *{}_sz);", pop, name, name),
            format!("*{}_sz /= sizeof(**{});", name, name),
        ],
        AbiType::Base(BaseType::Address) => vec![
            format!("if(*{} == NULL){{", name),
            format!("\t*{} = malloc(sizeof({}));", name, ADDRESS_STRUCT),
            "}".to_string(),
            format!("if(*{} == NULL){{", name),
            "\tqtumErase();".to_string(),
            "}else{".to_string(),
            format!("\t{}(*{}, sizeof({}));", pop, name, ADDRESS_STRUCT),
            "}".to_string(),
        ],
        AbiType::Base(_) => vec![format!("*{} = {}();", name, pop)],
    }
}

/// Dispatcher side: declares a local named after `input` and fills it.
fn pop_input_into_local(input: &Parameter) -> Vec<String> {
    let pop = stack_primitives(input.ty).pop;
    let name = &input.name;
    match input.ty {
        AbiType::Array(base) => vec![
            format!("size_t {}_sz = qtumPeekSize();", name),
            format!("{}* {} = malloc({}_sz);", base.c_name(), name, name),
            format!("{}({}, {}_sz);", pop, name, name),
            format!("{}_sz /= sizeof(*{});", name, name),
        ],
        AbiType::Base(BaseType::Address) => vec![
            format!("{}* {} = malloc(sizeof({}));", ADDRESS_STRUCT, name, ADDRESS_STRUCT),
            format!("{}({}, sizeof({}));", pop, name, ADDRESS_STRUCT),
        ],
        AbiType::Base(base) => vec![format!("{} {} = {}();", base.c_name(), name, pop)],
    }
}
