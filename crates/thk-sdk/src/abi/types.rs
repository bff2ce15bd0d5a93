//! ABI type definitions

use std::fmt;
use std::str::FromStr;

use thk_primitives::{Address, H256, I256, U256};

use super::AbiError;

/// Solidity ABI token types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Signed integer (8-256 bits)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Dynamic array
    Array(Vec<Token>),
    /// Fixed-size array
    FixedArray(Vec<Token>),
    /// Tuple (struct)
    Tuple(Vec<Token>),
}

/// Solidity parameter types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size
    Int(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Dynamic array
    Array(Box<ParamType>),
    /// Fixed-size array
    FixedArray(Box<ParamType>, usize),
    /// Tuple
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(types) => types.iter().any(|t| t.is_dynamic()),
            _ => false,
        }
    }

    /// Bytes this type occupies in the head of its enclosing region.
    ///
    /// Dynamic types occupy one pointer word. Saturates at `usize::MAX` for
    /// types too large to address.
    pub fn head_length(&self) -> usize {
        match self {
            ParamType::FixedArray(inner, size) if !self.is_dynamic() => {
                inner.head_length().saturating_mul(*size)
            }
            ParamType::Tuple(types) if !self.is_dynamic() => types
                .iter()
                .map(ParamType::head_length)
                .fold(0, usize::saturating_add),
            _ => 32,
        }
    }

    /// Parse a type string whose `tuple` base takes its fields from
    /// `components`, e.g. `tuple[2]` with two component types.
    pub fn parse_with_components(
        s: &str,
        components: &[ParamType],
    ) -> Result<ParamType, AbiError> {
        let s = s.trim();
        if s == "tuple" {
            return Ok(ParamType::Tuple(components.to_vec()));
        }
        if s.ends_with(']') && s.starts_with("tuple") {
            let (inner, size) = split_array_suffix(s)?;
            let inner = Self::parse_with_components(inner, components)?;
            return Ok(wrap_array(inner, size));
        }
        s.parse()
    }
}

/// Splits `T[N]` / `T[]` into `T` and the optional size.
fn split_array_suffix(s: &str) -> Result<(&str, Option<usize>), AbiError> {
    let open = s
        .rfind('[')
        .ok_or_else(|| AbiError::TypeParse(s.to_string()))?;
    let inner = &s[..open];
    let size = &s[open + 1..s.len() - 1];
    if inner.is_empty() {
        return Err(AbiError::TypeParse(s.to_string()));
    }
    if size.is_empty() {
        return Ok((inner, None));
    }
    match size.parse::<usize>() {
        Ok(n) if n > 0 => Ok((inner, Some(n))),
        _ => Err(AbiError::TypeParse(s.to_string())),
    }
}

fn wrap_array(inner: ParamType, size: Option<usize>) -> ParamType {
    match size {
        Some(n) => ParamType::FixedArray(Box::new(inner), n),
        None => ParamType::Array(Box::new(inner)),
    }
}

/// Splits `a,(b,c),d` on top-level commas.
fn split_tuple_fields(body: &str) -> Result<Vec<&str>, AbiError> {
    let mut fields = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| AbiError::TypeParse(body.to_string()))?;
            }
            ',' if depth == 0 => {
                fields.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(AbiError::TypeParse(body.to_string()));
    }
    fields.push(&body[start..]);
    Ok(fields)
}

fn parse_width(rest: &str, full: &str, max: usize, step: usize) -> Result<usize, AbiError> {
    if rest.is_empty() {
        return Ok(max);
    }
    if rest.starts_with('0') {
        return Err(AbiError::TypeParse(full.to_string()));
    }
    match rest.parse::<usize>() {
        Ok(n) if n >= step && n <= max && n % step == 0 => Ok(n),
        _ => Err(AbiError::TypeParse(full.to_string())),
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.ends_with(']') {
            let (inner, size) = split_array_suffix(s)?;
            return Ok(wrap_array(inner.parse()?, size));
        }

        if let Some(body) = s.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
            if body.trim().is_empty() {
                return Ok(ParamType::Tuple(Vec::new()));
            }
            let fields = split_tuple_fields(body)?
                .into_iter()
                .map(str::parse)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(ParamType::Tuple(fields));
        }

        match s {
            "address" => return Ok(ParamType::Address),
            "bool" => return Ok(ParamType::Bool),
            "string" => return Ok(ParamType::String),
            "bytes" => return Ok(ParamType::Bytes),
            _ => {}
        }

        if let Some(rest) = s.strip_prefix("uint") {
            return Ok(ParamType::Uint(parse_width(rest, s, 256, 8)?));
        }
        if let Some(rest) = s.strip_prefix("int") {
            return Ok(ParamType::Int(parse_width(rest, s, 256, 8)?));
        }
        if let Some(rest) = s.strip_prefix("bytes") {
            if !rest.is_empty() {
                return Ok(ParamType::FixedBytes(parse_width(rest, s, 32, 1)?));
            }
        }

        Err(AbiError::TypeParse(s.to_string()))
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => f.write_str("address"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Bool => f.write_str("bool"),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::FixedBytes(size) => write!(f, "bytes{}", size),
            ParamType::String => f.write_str("string"),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, size) => write!(f, "{}[{}]", inner, size),
            ParamType::Tuple(types) => {
                f.write_str("(")?;
                for (i, t) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", t)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl Token {
    /// Create a uint256 from u128
    pub fn uint(value: u128) -> Self {
        Token::Uint(U256::from(value))
    }

    /// Create an int256 from i128
    pub fn int(value: i128) -> Self {
        Token::Int(I256::from_i128(value))
    }

    /// Create a string token
    pub fn string(s: impl Into<String>) -> Self {
        Token::String(s.into())
    }

    /// Create a bytes32 token
    pub fn bytes32(data: H256) -> Self {
        Token::FixedBytes(data.as_bytes().to_vec())
    }

    /// Short description of the token's shape, for error messages
    pub fn kind(&self) -> String {
        match self {
            Token::Address(_) => "address".to_string(),
            Token::Uint(_) => "uint".to_string(),
            Token::Int(_) => "int".to_string(),
            Token::Bool(_) => "bool".to_string(),
            Token::Bytes(_) => "bytes".to_string(),
            Token::FixedBytes(b) => format!("bytes{}", b.len()),
            Token::String(_) => "string".to_string(),
            Token::Array(t) => format!("array of {}", t.len()),
            Token::FixedArray(t) => format!("fixed array of {}", t.len()),
            Token::Tuple(t) => format!("tuple of {}", t.len()),
        }
    }

    /// Unsigned integer value, if this is a `Uint`
    pub fn into_uint(self) -> Option<U256> {
        match self {
            Token::Uint(v) => Some(v),
            _ => None,
        }
    }

    /// Address value, if this is an `Address`
    pub fn into_address(self) -> Option<Address> {
        match self {
            Token::Address(a) => Some(a),
            _ => None,
        }
    }

    /// String value, if this is a `String`
    pub fn into_string(self) -> Option<String> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }

    /// Bool value, if this is a `Bool`
    pub fn into_bool(self) -> Option<bool> {
        match self {
            Token::Bool(b) => Some(b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> ParamType {
        s.parse().unwrap()
    }

    #[test]
    fn test_param_type_is_dynamic() {
        assert!(!ParamType::Address.is_dynamic());
        assert!(!ParamType::FixedBytes(32).is_dynamic());
        assert!(!parse("uint256[3]").is_dynamic());
        assert!(!parse("(uint8,address)").is_dynamic());

        assert!(ParamType::Bytes.is_dynamic());
        assert!(ParamType::String.is_dynamic());
        assert!(parse("uint256[]").is_dynamic());
        assert!(parse("string[2]").is_dynamic());
        assert!(parse("(uint8,bytes)").is_dynamic());
    }

    #[test]
    fn test_head_length() {
        assert_eq!(ParamType::Bool.head_length(), 32);
        assert_eq!(parse("uint256[3]").head_length(), 96);
        assert_eq!(parse("(uint8,address)[2]").head_length(), 128);
        assert_eq!(parse("string[2]").head_length(), 32);
        assert_eq!(parse("uint256[576460752303423488]").head_length(), usize::MAX);
    }

    #[test]
    fn test_parse_basic_types() {
        assert_eq!(parse("address"), ParamType::Address);
        assert_eq!(parse("uint"), ParamType::Uint(256));
        assert_eq!(parse("int"), ParamType::Int(256));
        assert_eq!(parse("uint8"), ParamType::Uint(8));
        assert_eq!(parse("int120"), ParamType::Int(120));
        assert_eq!(parse("bytes"), ParamType::Bytes);
        assert_eq!(parse("bytes1"), ParamType::FixedBytes(1));
        assert_eq!(parse("bytes32"), ParamType::FixedBytes(32));
        assert_eq!(parse(" string "), ParamType::String);
    }

    #[test]
    fn test_parse_rejects_bad_widths() {
        for bad in ["uint7", "uint0", "uint264", "int08", "bytes0", "bytes33", "uintx", "fixed128x18", "", "[]", "uint[0]", "uint[x]"] {
            assert!(
                matches!(bad.parse::<ParamType>(), Err(AbiError::TypeParse(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_parse_arrays() {
        assert_eq!(parse("uint256[]"), ParamType::Array(Box::new(ParamType::Uint(256))));
        assert_eq!(
            parse("address[4]"),
            ParamType::FixedArray(Box::new(ParamType::Address), 4)
        );
        // suffixes apply left to right: uint8[2][] is a dynamic array of uint8[2]
        assert_eq!(
            parse("uint8[2][]"),
            ParamType::Array(Box::new(ParamType::FixedArray(Box::new(ParamType::Uint(8)), 2)))
        );
    }

    #[test]
    fn test_parse_inline_tuples() {
        assert_eq!(
            parse("(uint256,(bool,string))[]"),
            ParamType::Array(Box::new(ParamType::Tuple(vec![
                ParamType::Uint(256),
                ParamType::Tuple(vec![ParamType::Bool, ParamType::String]),
            ])))
        );
        assert_eq!(parse("()"), ParamType::Tuple(vec![]));
        assert!("(uint256".parse::<ParamType>().is_err());
        assert!("(uint256,)".parse::<ParamType>().is_err());
    }

    #[test]
    fn test_parse_with_components() {
        let fields = vec![ParamType::Address, ParamType::Uint(64)];
        assert_eq!(
            ParamType::parse_with_components("tuple", &fields).unwrap(),
            ParamType::Tuple(fields.clone())
        );
        assert_eq!(
            ParamType::parse_with_components("tuple[2]", &fields).unwrap(),
            ParamType::FixedArray(Box::new(ParamType::Tuple(fields.clone())), 2)
        );
        assert_eq!(
            ParamType::parse_with_components("uint8", &fields).unwrap(),
            ParamType::Uint(8)
        );
    }

    #[test]
    fn test_display_canonical() {
        for s in ["uint256", "bytes32", "uint256[3]", "(uint256,address)[]", "string[][2]", "()"] {
            assert_eq!(parse(s).to_string(), s);
        }
        assert_eq!(parse("uint").to_string(), "uint256");
    }

    #[test]
    fn test_token_helpers() {
        assert_eq!(Token::uint(5), Token::Uint(U256::from(5)));
        assert_eq!(Token::int(-5).kind(), "int");
        assert_eq!(Token::FixedBytes(vec![0; 4]).kind(), "bytes4");
        assert_eq!(Token::uint(9).into_uint(), Some(U256::from(9)));
        assert_eq!(Token::Bool(true).into_uint(), None);
        assert_eq!(Token::string("x").into_string().as_deref(), Some("x"));
    }
}
