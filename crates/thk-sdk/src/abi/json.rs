//! JSON ABI descriptions
//!
//! An [`Abi`] is parsed once from the standard JSON document and then shared
//! read-only by every pack/unpack against the contract.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use thk_primitives::H256;

use super::decode::decode;
use super::encode::{encode, function_selector};
use super::types::{ParamType, Token};
use super::AbiError;

#[derive(Debug, Deserialize)]
struct JsonParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    components: Vec<JsonParam>,
    #[serde(default)]
    indexed: bool,
}

#[derive(Debug, Deserialize)]
struct JsonEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<JsonParam>,
    #[serde(default)]
    outputs: Vec<JsonParam>,
    #[serde(default)]
    constant: bool,
    #[serde(rename = "stateMutability", default)]
    state_mutability: Option<String>,
    #[serde(default)]
    anonymous: bool,
}

fn default_entry_type() -> String {
    "function".to_string()
}

/// Named, typed parameter of a function or event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name (may be empty)
    pub name: String,
    /// Parameter type
    pub kind: ParamType,
    /// Whether the parameter is an indexed event topic
    pub indexed: bool,
}

impl Param {
    fn from_json(param: &JsonParam) -> Result<Self, AbiError> {
        let components = param
            .components
            .iter()
            .map(|c| Param::from_json(c).map(|p| p.kind))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: param.name.clone(),
            kind: ParamType::parse_with_components(&param.kind, &components)?,
            indexed: param.indexed,
        })
    }
}

fn param_types(params: &[Param]) -> Vec<ParamType> {
    params.iter().map(|p| p.kind.clone()).collect()
}

fn type_list(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| p.kind.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Contract function (or constructor, whose name is empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Input parameters
    pub inputs: Vec<Param>,
    /// Output parameters
    pub outputs: Vec<Param>,
    /// View/pure function
    pub constant: bool,
}

impl Function {
    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, type_list(&self.inputs))
    }

    /// First four bytes of the keccak-256 of the signature
    pub fn selector(&self) -> [u8; 4] {
        function_selector(&self.signature())
    }

    /// Input types in declaration order
    pub fn input_types(&self) -> Vec<ParamType> {
        param_types(&self.inputs)
    }

    /// Output types in declaration order
    pub fn output_types(&self) -> Vec<ParamType> {
        param_types(&self.outputs)
    }

    /// Call data: selector followed by the packed arguments.
    pub fn encode_input(&self, tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
        let mut data = self.selector().to_vec();
        data.extend(encode(&self.input_types(), tokens)?);
        Ok(data)
    }

    /// Arguments of call data produced by [`Function::encode_input`].
    pub fn decode_input(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        if data.len() < 4 || data[..4] != self.selector() {
            return Err(AbiError::InvalidData(format!(
                "call data does not start with the selector of {}",
                self.signature()
            )));
        }
        decode(&self.input_types(), &data[4..])
    }

    /// Return values of the function
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        decode(&self.output_types(), data)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs: Vec<String> = self
            .inputs
            .iter()
            .map(|p| format!("{} {}", p.kind, p.name))
            .collect();
        let outputs: Vec<String> = self
            .outputs
            .iter()
            .map(|p| {
                if p.name.is_empty() {
                    p.kind.to_string()
                } else {
                    format!("{} {}", p.kind, p.name)
                }
            })
            .collect();
        write!(
            f,
            "function {}({}) {}returns({})",
            self.name,
            inputs.join(", "),
            if self.constant { "constant " } else { "" },
            outputs.join(", ")
        )
    }
}

/// Contract event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event name
    pub name: String,
    /// Parameters, indexed ones included
    pub inputs: Vec<Param>,
    /// Anonymous events carry no id topic
    pub anonymous: bool,
}

impl Event {
    /// Canonical signature, e.g. `Transfer(address,address,uint256)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, type_list(&self.inputs))
    }

    /// Topic id: keccak-256 of the signature
    pub fn id(&self) -> H256 {
        thk_crypto::keccak256(self.signature().as_bytes())
    }

    /// Decode the non-indexed parameters from a log's data field.
    pub fn decode_data(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        let types: Vec<ParamType> = self
            .inputs
            .iter()
            .filter(|p| !p.indexed)
            .map(|p| p.kind.clone())
            .collect();
        decode(&types, data)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs: Vec<String> = self
            .inputs
            .iter()
            .map(|p| {
                if p.indexed {
                    format!("{} indexed {}", p.kind, p.name)
                } else {
                    format!("{} {}", p.kind, p.name)
                }
            })
            .collect();
        write!(f, "event {}({})", self.name, inputs.join(", "))
    }
}

/// Parsed contract ABI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Abi {
    /// Constructor, if declared
    pub constructor: Option<Function>,
    /// Functions by name. A later overload replaces an earlier one.
    pub functions: BTreeMap<String, Function>,
    /// Events by name
    pub events: BTreeMap<String, Event>,
    /// Whether a fallback function is declared
    pub fallback: bool,
}

impl Abi {
    /// Parse a JSON ABI document
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let entries: Vec<JsonEntry> =
            serde_json::from_str(json).map_err(|e| AbiError::Json(e.to_string()))?;

        let mut abi = Abi::default();
        for entry in &entries {
            let inputs = entry
                .inputs
                .iter()
                .map(Param::from_json)
                .collect::<Result<Vec<_>, _>>()?;
            match entry.kind.as_str() {
                "function" | "constructor" => {
                    let outputs = entry
                        .outputs
                        .iter()
                        .map(Param::from_json)
                        .collect::<Result<Vec<_>, _>>()?;
                    let constant = entry.constant
                        || matches!(entry.state_mutability.as_deref(), Some("view" | "pure"));
                    if entry.kind == "constructor" {
                        abi.constructor = Some(Function {
                            name: String::new(),
                            inputs,
                            outputs,
                            constant,
                        });
                    } else {
                        abi.functions.insert(
                            entry.name.clone(),
                            Function {
                                name: entry.name.clone(),
                                inputs,
                                outputs,
                                constant,
                            },
                        );
                    }
                }
                "event" => {
                    abi.events.insert(
                        entry.name.clone(),
                        Event {
                            name: entry.name.clone(),
                            inputs,
                            anonymous: entry.anonymous,
                        },
                    );
                }
                "fallback" | "receive" => abi.fallback = true,
                other => {
                    return Err(AbiError::Json(format!("unknown entry type {:?}", other)));
                }
            }
        }
        Ok(abi)
    }

    /// Function by name
    pub fn function(&self, name: &str) -> Result<&Function, AbiError> {
        self.functions
            .get(name)
            .ok_or_else(|| AbiError::UnknownMethod(name.to_string()))
    }

    /// Event by name
    pub fn event(&self, name: &str) -> Result<&Event, AbiError> {
        self.events
            .get(name)
            .ok_or_else(|| AbiError::UnknownEvent(name.to_string()))
    }

    /// Pack arguments for `name`.
    ///
    /// An empty name packs constructor arguments, without a selector. A
    /// contract with no declared constructor takes no arguments.
    pub fn pack(&self, name: &str, tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
        if name.is_empty() {
            let types = self
                .constructor
                .as_ref()
                .map(Function::input_types)
                .unwrap_or_default();
            return encode(&types, tokens);
        }
        self.function(name)?.encode_input(tokens)
    }

    /// Unpack the outputs of function `name`.
    pub fn unpack(&self, name: &str, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        self.function(name)?.decode_output(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thk_primitives::Address;

    const ABI: &str = r#"[
        {"type":"constructor","inputs":[{"name":"supply","type":"uint256"}]},
        {"constant":false,"inputs":[{"name":"to","type":"address"},{"name":"value","type":"uint256"}],
         "name":"transfer","outputs":[{"name":"","type":"bool"}],"type":"function"},
        {"inputs":[{"name":"owner","type":"address"}],"name":"balanceOf",
         "outputs":[{"name":"balance","type":"uint256"}],"stateMutability":"view"},
        {"name":"setPoint","type":"function","inputs":[{"name":"p","type":"tuple",
         "components":[{"name":"x","type":"int32"},{"name":"tags","type":"string[]"}]}]},
        {"anonymous":false,"name":"Transfer","type":"event","inputs":[
         {"indexed":true,"name":"from","type":"address"},
         {"indexed":true,"name":"to","type":"address"},
         {"indexed":false,"name":"value","type":"uint256"}]},
        {"type":"fallback"}
    ]"#;

    #[test]
    fn test_from_json() {
        let abi = Abi::from_json(ABI).unwrap();
        assert_eq!(abi.functions.len(), 3);
        assert_eq!(abi.events.len(), 1);
        assert!(abi.fallback);
        assert_eq!(abi.constructor.as_ref().unwrap().inputs.len(), 1);
        assert!(abi.function("balanceOf").unwrap().constant);
        assert!(!abi.function("transfer").unwrap().constant);
    }

    #[test]
    fn test_signature_and_selector() {
        let abi = Abi::from_json(ABI).unwrap();
        let transfer = abi.function("transfer").unwrap();
        assert_eq!(transfer.signature(), "transfer(address,uint256)");
        assert_eq!(transfer.selector(), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(
            abi.function("setPoint").unwrap().signature(),
            "setPoint((int32,string[]))"
        );
    }

    #[test]
    fn test_function_display() {
        let abi = Abi::from_json(ABI).unwrap();
        assert_eq!(
            abi.function("transfer").unwrap().to_string(),
            "function transfer(address to, uint256 value) returns(bool)"
        );
        assert_eq!(
            abi.function("balanceOf").unwrap().to_string(),
            "function balanceOf(address owner) constant returns(uint256 balance)"
        );
    }

    #[test]
    fn test_event() {
        let abi = Abi::from_json(ABI).unwrap();
        let event = abi.event("Transfer").unwrap();
        assert_eq!(event.signature(), "Transfer(address,address,uint256)");
        assert_eq!(
            event.id().to_hex(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
        assert_eq!(
            event.to_string(),
            "event Transfer(address indexed from, address indexed to, uint256 value)"
        );

        let data = encode(&[ParamType::Uint(256)], &[Token::uint(42)]).unwrap();
        assert_eq!(event.decode_data(&data).unwrap(), vec![Token::uint(42)]);
    }

    #[test]
    fn test_pack_unpack() {
        let abi = Abi::from_json(ABI).unwrap();
        let to = Address::from_hex("0x33819ba73fb9a63b547815822c044530124bd4b1").unwrap();
        let args = [Token::Address(to), Token::uint(1)];

        let data = abi.pack("transfer", &args).unwrap();
        assert_eq!(data.len(), 68);
        assert_eq!(abi.function("transfer").unwrap().decode_input(&data).unwrap(), args);

        let mut out = [0u8; 32];
        out[31] = 1;
        assert_eq!(abi.unpack("transfer", &out).unwrap(), vec![Token::Bool(true)]);
    }

    #[test]
    fn test_pack_constructor_has_no_selector() {
        let abi = Abi::from_json(ABI).unwrap();
        let data = abi.pack("", &[Token::uint(1000)]).unwrap();
        assert_eq!(data.len(), 32);
        assert_eq!(data[30..], [0x03, 0xe8]);
    }

    #[test]
    fn test_pack_tuple_argument() {
        let abi = Abi::from_json(ABI).unwrap();
        let point = Token::Tuple(vec![
            Token::int(-5),
            Token::Array(vec![Token::string("a")]),
        ]);
        let data = abi.pack("setPoint", &[point.clone()]).unwrap();
        assert_eq!((data.len() - 4) % 32, 0);
        assert_eq!(
            abi.function("setPoint").unwrap().decode_input(&data).unwrap(),
            vec![point]
        );
    }

    #[test]
    fn test_unknown_method() {
        let abi = Abi::from_json(ABI).unwrap();
        assert_eq!(
            abi.pack("mint", &[]),
            Err(AbiError::UnknownMethod("mint".into()))
        );
        assert!(matches!(abi.event("Approval"), Err(AbiError::UnknownEvent(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Abi::from_json("{"), Err(AbiError::Json(_))));
        assert!(matches!(
            Abi::from_json(r#"[{"type":"function","name":"f","inputs":[{"name":"a","type":"uint7"}]}]"#),
            Err(AbiError::TypeParse(_))
        ));
    }
}
