use crate::abi::{function_selector, AbiType, BaseType, Function, Parameter};
use crate::error::ParseError;
use crate::parser::{self, parse_line, InterfaceRef, Line};
use anyhow::Result;


fn param(name: &str, ty: AbiType) -> Parameter {
    Parameter::new(name, ty)
}

fn uint(name: &str, base: BaseType) -> Parameter {
    param(name, AbiType::Base(base))
}

#[test]
fn test_parse_name() -> Result<()> {
    let line = parse_line(":name=AirDropToken", 0)?;
    assert_eq!(line, Line::Name("AirDropToken".to_string()));
    Ok(())
}

#[test]
fn test_parse_comment() -> Result<()> {
    assert_eq!(parse_line("# this is a comment", 0)?, Line::Comment);
    assert_eq!(parse_line("", 3)?, Line::Comment);
    assert_eq!(parse_line("   ", 4)?, Line::Comment);
    Ok(())
}

#[test]
fn test_parse_name_failures() {
    let err = parse_line("name=AirDropToken", 0).unwrap_err();
    assert!(matches!(err, ParseError::MissingColon { line: 0 }));
    assert_eq!(err.to_string(), "parser error: Expected \":\" at line 0");

    match parse_line(":version=0.2.0", 7) {
        Err(ParseError::UnknownAttribute { token, line }) => {
            assert_eq!(token, "version");
            assert_eq!(line, 7);
        }
        other => panic!("Expected unknown attribute error, got {:?}", other),
    }

    assert!(matches!(
        parse_line(":name:AirDropToken", 2),
        Err(ParseError::MalformedAttribute { line: 2 })
    ));
    assert!(matches!(
        parse_line(":name=", 0),
        Err(ParseError::MalformedAttribute { .. })
    ));
    assert!(matches!(
        parse_line(":name=A=B", 0),
        Err(ParseError::MalformedAttribute { .. })
    ));
}

#[test]
fn test_parse_function() -> Result<()> {
    let line = parse_line(
        "somevar:uint8 othervar:int64 myFunction:fn -> somereturn:uint8 otherreturn:int32",
        0,
    )?;
    let expected = Function {
        name: "myFunction".to_string(),
        inputs: vec![
            uint("somevar", BaseType::Uint8),
            uint("othervar", BaseType::Int64),
        ],
        outputs: vec![
            uint("somereturn", BaseType::Uint8),
            uint("otherreturn", BaseType::Int32),
        ],
        payable: false,
    };
    assert_eq!(line, Line::Function(expected));
    Ok(())
}

#[test]
fn test_parse_function_name_position_and_arrays() -> Result<()> {
    let line = parse_line(
        "owner:uniaddress  deposit:fn:payable amounts:uint64[] -> receipts:uniaddress[]",
        0,
    )?;
    match line {
        Line::Function(function) => {
            assert_eq!(function.name, "deposit");
            assert!(function.payable);
            assert_eq!(
                function.inputs,
                vec![
                    uint("owner", BaseType::Address),
                    param("amounts", AbiType::Array(BaseType::Uint64)),
                ]
            );
            assert_eq!(
                function.outputs,
                vec![param("receipts", AbiType::Array(BaseType::Address))]
            );
        }
        other => panic!("Expected function, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_parse_void_sides() -> Result<()> {
    match parse_line("void ping:fn -> void", 0)? {
        Line::Function(function) => {
            assert_eq!(function.name, "ping");
            assert!(function.inputs.is_empty());
            assert!(function.outputs.is_empty());
        }
        other => panic!("Expected function, got {:?}", other),
    }
    match parse_line("total:fn -> sum:uint32", 0)? {
        Line::Function(function) => assert!(function.inputs.is_empty()),
        other => panic!("Expected function, got {:?}", other),
    }
    assert!(matches!(
        parse_line("f:fn -> void x:uint8", 5),
        Err(ParseError::MisplacedVoid { line: 5 })
    ));
    Ok(())
}

#[test]
fn test_parse_function_errors() {
    assert!(matches!(
        parse_line("somevar:uint8 othervar:int64 -> somereturn:uint8 otherreturn:int32", 0),
        Err(ParseError::MissingFunctionName { line: 0 })
    ));

    match parse_line(":somevar:uint32:someothervar otherFunction:fn -> somereturn:uint32", 0) {
        Err(ParseError::MalformedParameter { token, .. }) => {
            assert_eq!(token, ":somevar:uint32:someothervar")
        }
        other => panic!("Expected malformed parameter, got {:?}", other),
    }

    match parse_line("somevar:uint18 otherFunction:fn -> somereturn:uint32", 3) {
        Err(err @ ParseError::InvalidType { .. }) => {
            assert!(err.to_string().ends_with("received uint18"));
            assert!(matches!(err, ParseError::InvalidType { ref token, line: 3 } if token == "uint18"));
        }
        other => panic!("Expected invalid type, got {:?}", other),
    }

    assert!(matches!(
        parse_line("somevar:uint32 -> otherFunction:fn -> somereturn:uin32", 0),
        Err(ParseError::MultipleSeparators { line: 0 })
    ));
    assert!(matches!(
        parse_line("somevar:uint32 otherFunction:fn somereturn:uint32", 1),
        Err(ParseError::MissingSeparator { line: 1 })
    ));
    assert!(matches!(
        parse_line("a:fn b:fn -> c:uint8", 0),
        Err(ParseError::MultipleFunctionNames { .. })
    ));
    assert!(matches!(
        parse_line("a:fn:view -> c:uint8", 0),
        Err(ParseError::UnknownModifier { ref modifier, .. }) if modifier == "view"
    ));
    assert!(matches!(
        parse_line("a:fn:payable:view -> c:uint8", 0),
        Err(ParseError::TooManyModifiers { .. })
    ));
    assert!(matches!(
        parse_line("x:uint8[][] a:fn -> void", 0),
        Err(ParseError::InvalidType { ref token, .. }) if token == "uint8[][]"
    ));
    assert!(matches!(
        parse_line("a:fn -> result", 0),
        Err(ParseError::MalformedParameter { ref token, .. }) if token == "result"
    ));
}

#[test]
fn test_parse_implements() -> Result<()> {
    let line = parse_line(
        ":implements=Token,(https://abi.example.com/Erc.abi),(../shared/Base.abi)",
        0,
    )?;
    assert_eq!(
        line,
        Line::Implements(vec![
            InterfaceRef::Bare("Token".to_string()),
            InterfaceRef::Located("https://abi.example.com/Erc.abi".to_string()),
            InterfaceRef::Located("../shared/Base.abi".to_string()),
        ])
    );

    assert!(matches!(
        parse_line(":implements=(https://abi.example.com/Erc.abi", 4),
        Err(ParseError::InvalidReference { line: 4, .. })
    ));
    assert!(matches!(
        parse_line(":implements=Token,,Other", 0),
        Err(ParseError::InvalidReference { .. })
    ));
    Ok(())
}

#[test]
fn test_parse_source() -> Result<()> {
    let source = "# Airdrop contract\n\
                  :name=AirDropToken\n\
                  \n\
                  recipient:uniaddress amount:uint64 drop:fn -> ok:uint8\n\
                  balance:fn -> amount:uint64\r\n";
    let contract = parser::parse(source)?;
    assert_eq!(contract.name, "AirDropToken");
    assert_eq!(contract.functions.len(), 2);
    assert_eq!(contract.functions[0].name, "drop");
    assert_eq!(contract.functions[1].name, "balance");
    assert_eq!(
        contract.function("balance").map(|f| f.outputs.clone()),
        Some(vec![uint("amount", BaseType::Uint64)])
    );
    Ok(())
}

#[test]
fn test_parse_errors_carry_line_numbers() {
    let err = parser::parse(":name=First\n# comment\n:name=Second\n").unwrap_err();
    match err {
        ParseError::DuplicateName { existing, line } => {
            assert_eq!(existing, "First");
            assert_eq!(line, 2);
        }
        other => panic!("Expected duplicate name, got {:?}", other),
    }

    let err = parser::parse(":name=Token\n\na:fn -> b:uint128\n").unwrap_err();
    assert!(matches!(err, ParseError::InvalidType { line: 2, .. }));
}

#[test]
fn test_parse_requires_name() {
    assert!(matches!(
        parser::parse("a:fn -> b:uint8\n"),
        Err(ParseError::MissingName)
    ));
}

#[test]
fn test_function_display_reparses() -> Result<()> {
    let function = Function {
        name: "swap".to_string(),
        inputs: vec![
            uint("from", BaseType::Address),
            param("amounts", AbiType::Array(BaseType::Int16)),
        ],
        outputs: vec![],
        payable: true,
    };
    let text = function.to_string();
    assert_eq!(text, "from:uniaddress amounts:int16[] swap:fn:payable -> void");
    assert_eq!(parse_line(&text, 0)?, Line::Function(function));
    Ok(())
}

#[test]
fn test_selector_is_reproducible_from_parsed_source() -> Result<()> {
    let line = "somevar:uint8 othervar:int64 myFunction:fn -> somereturn:uint8 otherreturn:int32";
    let selectors = (0..2)
        .map(|_| match parse_line(line, 0) {
            Ok(Line::Function(function)) => Ok(function_selector("MyContract", &function)),
            other => Err(anyhow::anyhow!("Expected function, got {:?}", other)),
        })
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(selectors[0], selectors[1]);
    assert_eq!(selectors[0].to_string(), "0x996c38c3");
    Ok(())
}
