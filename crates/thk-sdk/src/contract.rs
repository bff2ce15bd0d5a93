//! Contract interaction helpers
//!
//! A [`Contract`] packs call data from its ABI, and then hands the
//! transaction to a [`ThkClient`] to be called, signed or submitted. Nothing
//! is submitted when packing or signing fails.

use thk_primitives::bytes::{decode_prefixed, encode_prefixed, has_hex_prefix};

use crate::abi::{Abi, Event, Function, Param, ParamType, Token};
use crate::client::ThkClient;
use crate::transaction::Transaction;
use crate::types::TxResult;
use crate::wallet::Signer;
use crate::SdkError;

/// Contract described by an ABI
#[derive(Debug, Clone)]
pub struct Contract {
    abi: Abi,
}

impl Contract {
    /// Parse a JSON ABI
    pub fn new(abi_json: &str) -> Result<Self, SdkError> {
        Ok(Self {
            abi: Abi::from_json(abi_json)?,
        })
    }

    /// Wrap an already parsed ABI
    pub fn from_abi(abi: Abi) -> Self {
        Self { abi }
    }

    /// The contract's ABI
    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// Get a function by name
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.abi.functions.get(name)
    }

    /// `0x` hex call data for `method`
    pub fn input(&self, method: &str, args: &[Token]) -> Result<String, SdkError> {
        Ok(encode_prefixed(&self.abi.pack(method, args)?))
    }

    /// Execute `method` without submitting a transaction
    pub async fn call(
        &self,
        client: &ThkClient,
        mut tx: Transaction,
        method: &str,
        args: &[Token],
    ) -> Result<TxResult, SdkError> {
        tx.input = self.input(method, args)?;
        client.call_transaction(&tx).await
    }

    /// Pack and sign a call to `method`, returning the signed transaction
    /// without submitting it.
    pub fn sign_call(
        &self,
        client: &ThkClient,
        mut tx: Transaction,
        method: &str,
        signer: &dyn Signer,
        args: &[Token],
    ) -> Result<Transaction, SdkError> {
        tx.input = self.input(method, args)?;
        client.sign_transaction(&mut tx, signer, &[])?;
        Ok(tx)
    }

    /// Pack, sign and submit a call to `method`, returning the transaction hash
    pub async fn send(
        &self,
        client: &ThkClient,
        tx: Transaction,
        method: &str,
        signer: &dyn Signer,
        args: &[Token],
    ) -> Result<String, SdkError> {
        let tx = self.sign_call(client, tx, method, signer, args)?;
        client.send_tx(&tx).await
    }

    /// Deploy `bytecode` with packed constructor `args`, returning the
    /// transaction hash
    pub async fn deploy(
        &self,
        client: &ThkClient,
        mut tx: Transaction,
        bytecode: &str,
        signer: &dyn Signer,
        args: &[Token],
    ) -> Result<String, SdkError> {
        let packed = self.abi.pack("", args)?;
        tx.input = format!("{}{}", bytecode, hex::encode(packed));
        client.sign_transaction(&mut tx, signer, &[])?;
        client.send_tx(&tx).await
    }

    /// Unpack the hex output of `method`
    pub fn parse(&self, out: &str, method: &str) -> Result<Vec<Token>, SdkError> {
        let data = if has_hex_prefix(out) {
            decode_prefixed(out).map_err(|e| SdkError::InvalidHex(e.to_string()))?
        } else {
            hex::decode(out)?
        };
        Ok(self.abi.unpack(method, &data)?)
    }

    /// Submit an already signed transaction
    pub async fn send_transaction(
        &self,
        client: &ThkClient,
        tx: &Transaction,
    ) -> Result<String, SdkError> {
        client.send_tx(tx).await
    }
}

fn param(name: &str, kind: ParamType, indexed: bool) -> Param {
    Param {
        name: name.to_string(),
        kind,
        indexed,
    }
}

fn function(name: &str, inputs: Vec<Param>, output: ParamType, constant: bool) -> Function {
    Function {
        name: name.to_string(),
        inputs,
        outputs: vec![param("", output, false)],
        constant,
    }
}

/// Standard ERC-20 token interface
pub fn erc20() -> Contract {
    let address = |name| param(name, ParamType::Address, false);
    let amount = |name| param(name, ParamType::Uint(256), false);

    let functions = [
        function("name", vec![], ParamType::String, true),
        function("symbol", vec![], ParamType::String, true),
        function("decimals", vec![], ParamType::Uint(8), true),
        function("totalSupply", vec![], ParamType::Uint(256), true),
        function("balanceOf", vec![address("owner")], ParamType::Uint(256), true),
        function(
            "transfer",
            vec![address("to"), amount("value")],
            ParamType::Bool,
            false,
        ),
        function(
            "approve",
            vec![address("spender"), amount("value")],
            ParamType::Bool,
            false,
        ),
        function(
            "allowance",
            vec![address("owner"), address("spender")],
            ParamType::Uint(256),
            true,
        ),
        function(
            "transferFrom",
            vec![address("from"), address("to"), amount("value")],
            ParamType::Bool,
            false,
        ),
    ];
    let events = [
        Event {
            name: "Transfer".to_string(),
            inputs: vec![
                param("from", ParamType::Address, true),
                param("to", ParamType::Address, true),
                amount("value"),
            ],
            anonymous: false,
        },
        Event {
            name: "Approval".to_string(),
            inputs: vec![
                param("owner", ParamType::Address, true),
                param("spender", ParamType::Address, true),
                amount("value"),
            ],
            anonymous: false,
        },
    ];

    Contract::from_abi(Abi {
        constructor: None,
        functions: functions
            .into_iter()
            .map(|f| (f.name.clone(), f))
            .collect(),
        events: events.into_iter().map(|e| (e.name.clone(), e)).collect(),
        fallback: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use thk_primitives::{Address, U256};

    #[test]
    fn test_contract_input() {
        let contract = erc20();
        let to = Address::from_hex("0x1234567890123456789012345678901234567890").unwrap();

        let data = contract
            .input("transfer", &[Token::Address(to), Token::uint(1000)])
            .unwrap();

        assert!(data.starts_with("0xa9059cbb"));
        assert_eq!(data.len(), 2 + 68 * 2);
    }

    #[test]
    fn test_contract_parse() {
        let contract = erc20();
        let out = format!("0x{:064x}", 100);
        let tokens = contract.parse(&out, "balanceOf").unwrap();
        assert_eq!(tokens, vec![Token::Uint(U256::from(100))]);

        // unprefixed output is accepted too
        assert_eq!(contract.parse(&out[2..], "balanceOf").unwrap(), tokens);
        assert!(contract.parse("0xzz", "balanceOf").is_err());
    }

    #[test]
    fn test_contract_unknown_function() {
        let result = erc20().input("unknown", &[]);
        assert!(matches!(result, Err(SdkError::Abi(_))));
    }

    #[test]
    fn test_contract_wrong_arg_count() {
        let result = erc20().input("transfer", &[Token::Address(Address::ZERO)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_erc20_helper() {
        let contract = erc20();
        for name in [
            "name",
            "symbol",
            "decimals",
            "totalSupply",
            "balanceOf",
            "transfer",
            "approve",
            "allowance",
            "transferFrom",
        ] {
            assert!(contract.function(name).is_some(), "missing {}", name);
        }
        assert_eq!(
            contract.function("transferFrom").unwrap().signature(),
            "transferFrom(address,address,uint256)"
        );
        assert_eq!(
            contract.abi().event("Transfer").unwrap().id().to_hex(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }
}
