pub mod error;

pub use error::{EnsError, Result};

use alloy::hex;
use alloy::primitives::{keccak256, Address, B256};
use serde::Deserialize;
use serde_json::json;

/// ENS registry, same address on mainnet and the public testnets.
pub const ENS_REGISTRY: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

/// `resolver(bytes32)`
const RESOLVER_SELECTOR: &str = "0178b8bf";

/// `addr(bytes32)`
const ADDR_SELECTOR: &str = "3b3b57de";

/// EIP-137 namehash. The empty name hashes to the zero node.
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(buf);
    }
    node
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

pub struct EnsClient {
    client: reqwest::Client,
    rpc_url: String,
}

impl EnsClient {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            rpc_url: rpc_url.to_string(),
        }
    }

    /// Resolve `name` to the address its resolver reports.
    ///
    /// Returns `Ok(None)` when the name has no resolver or the resolver has no
    /// address record. Names are hashed exactly as given; callers normalize case.
    pub async fn resolve(&self, name: &str) -> Result<Option<Address>> {
        let node = namehash(name);

        let resolver_word = self.call(ENS_REGISTRY, RESOLVER_SELECTOR, node).await?;
        let Some(resolver) = word_to_address(&resolver_word)? else {
            tracing::debug!(name, "No resolver set");
            return Ok(None);
        };

        let resolver_hex = resolver.to_checksum(None);
        let addr_word = self.call(&resolver_hex, ADDR_SELECTOR, node).await?;
        let address = word_to_address(&addr_word)?;
        tracing::debug!(name, resolver = %resolver_hex, found = address.is_some(), "Resolved name");
        Ok(address)
    }

    async fn call(&self, to: &str, selector: &str, node: B256) -> Result<String> {
        let data = format!("0x{selector}{}", hex::encode(node));
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [{ "to": to, "data": data }, "latest"],
        });

        let resp = self.client.post(&self.rpc_url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(EnsError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        let rpc: RpcResponse = serde_json::from_str(&text)?;
        if let Some(err) = rpc.error {
            return Err(EnsError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        rpc.result
            .ok_or_else(|| EnsError::Parse("eth_call response had no result".to_string()))
    }
}

/// Decode an ABI-encoded address word. Empty return data and the zero address both mean "unset".
fn word_to_address(word: &str) -> Result<Option<Address>> {
    let bytes = hex::decode(word).map_err(|e| EnsError::Parse(format!("{word}: {e}")))?;
    if bytes.len() < 32 {
        return Ok(None);
    }
    let address = Address::from_slice(&bytes[12..32]);
    if address == Address::ZERO {
        Ok(None)
    } else {
        Ok(Some(address))
    }
}
