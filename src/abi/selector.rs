use super::ast::Function;
use sha2::{Digest, Sha256};
use std::fmt;

/// The 4-byte tag a dispatcher switches on to find the called function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector([u8; 4]);

impl Selector {
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

/// Lowercase hex literal, e.g. `0x01c66199`.
impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Input types, the qualified function name, `->`, then the output types,
/// separated by single spaces.
pub fn canonical_signature(contract_name: &str, function: &Function) -> String {
    let mut parts: Vec<String> = function.inputs.iter().map(|p| p.ty.to_string()).collect();
    parts.push(format!("{}_{}", contract_name, function.name));
    parts.push("->".to_string());
    parts.extend(function.outputs.iter().map(|p| p.ty.to_string()));
    parts.join(" ")
}

/// Hashes the canonical signature using SHA256, and then truncates to four bytes.
pub fn function_selector(contract_name: &str, function: &Function) -> Selector {
    let hash = Sha256::digest(canonical_signature(contract_name, function).as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    Selector(selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::ast::{AbiType, BaseType, Parameter};

    fn my_function() -> Function {
        Function {
            name: "myFunction".to_string(),
            inputs: vec![
                Parameter::new("somevar", AbiType::Base(BaseType::Uint8)),
                Parameter::new("othervar", AbiType::Base(BaseType::Int64)),
            ],
            outputs: vec![
                Parameter::new("somereturn", AbiType::Base(BaseType::Uint8)),
                Parameter::new("otherreturn", AbiType::Base(BaseType::Int32)),
            ],
            payable: false,
        }
    }

    #[test]
    fn test_canonical_signature() {
        assert_eq!(
            canonical_signature("MyContract", &my_function()),
            "uint8 int64 MyContract_myFunction -> uint8 int32"
        );
    }

    #[test]
    fn test_golden_selectors() {
        assert_eq!(function_selector("MyContract", &my_function()).to_string(), "0x996c38c3");

        let other = Function {
            name: "otherFunction".to_string(),
            inputs: vec![Parameter::new("somevar", AbiType::Base(BaseType::Uint8))],
            outputs: vec![Parameter::new("somereturn", AbiType::Base(BaseType::Uint32))],
            payable: false,
        };
        assert_eq!(function_selector("MyContract", &other).to_string(), "0x01c66199");

        let address = Function {
            name: "myFunction".to_string(),
            inputs: vec![Parameter::new("addressvar", AbiType::Base(BaseType::Address))],
            outputs: vec![Parameter::new("addressreturn", AbiType::Base(BaseType::Address))],
            payable: false,
        };
        assert_eq!(function_selector("MyContract", &address).to_string(), "0x6985f0c9");
    }

    #[test]
    fn test_selector_ignores_names_and_payable() {
        let mut renamed = my_function();
        renamed.inputs[0].name = "renamed".to_string();
        renamed.payable = true;
        assert_eq!(
            function_selector("MyContract", &renamed),
            function_selector("MyContract", &my_function())
        );
    }

    #[test]
    fn test_selector_changes_with_each_field() {
        let base = function_selector("MyContract", &my_function());

        assert_ne!(function_selector("OtherContract", &my_function()), base);

        let mut renamed = my_function();
        renamed.name = "myFunction2".to_string();
        assert_ne!(function_selector("MyContract", &renamed), base);

        let mut retyped = my_function();
        retyped.inputs[1].ty = AbiType::Base(BaseType::Uint64);
        assert_ne!(function_selector("MyContract", &retyped), base);

        let mut array_out = my_function();
        array_out.outputs[1].ty = AbiType::Array(BaseType::Int32);
        assert_ne!(function_selector("MyContract", &array_out), base);
    }
}
