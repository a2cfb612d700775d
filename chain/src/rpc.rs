//! Blocking JSON-RPC implementation of [`ChainClient`].
//!
//! Talks to a live node or a local fork over HTTP. The whole vote flow is
//! synchronous, so the client blocks on every request and polls for the
//! transaction receipt. `advance_time`/`mine` map to the `evm_*` methods
//! dev and forked nodes expose; production nodes reject them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::{Address, B256};
use serde_json::{json, Value};
use tracing::debug;

use crate::client::{ChainClient, Receipt, TxRequest};
use crate::contracts::decode_log;
use crate::error::ChainError;

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const RECEIPT_POLL_ATTEMPTS: u32 = 240;

pub struct JsonRpcClient {
    url: String,
    http: reqwest::blocking::Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::blocking::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        let response: Value = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            .json()
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        if let Some(error) = response.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown rpc error");
            if message.contains("revert") {
                return Err(ChainError::Revert(message.to_string()));
            }
            return Err(ChainError::Rpc(message.to_string()));
        }
        Ok(response.get("result").cloned().unwrap_or(Value::Null))
    }

    fn receipt_from_json(&self, value: &Value) -> Result<Receipt, ChainError> {
        if value
            .get("status")
            .and_then(Value::as_str)
            .is_some_and(|s| s == "0x0")
        {
            return Err(ChainError::Revert("transaction failed".into()));
        }
        let tx_hash = parse_b256(value.get("transactionHash"))?;
        let block_number = parse_hex_u64(value.get("blockNumber"))?;

        let mut events = Vec::new();
        if let Some(logs) = value.get("logs").and_then(Value::as_array) {
            for log in logs {
                let address_bytes = parse_hex_bytes(log.get("address"))?;
                if address_bytes.len() != 20 {
                    return Err(ChainError::Rpc("malformed log address".into()));
                }
                let address = Address::from_slice(&address_bytes);
                let mut topics = Vec::new();
                if let Some(raw) = log.get("topics").and_then(Value::as_array) {
                    for t in raw {
                        topics.push(parse_b256(Some(t))?);
                    }
                }
                let data = parse_hex_bytes(log.get("data"))?;
                if let Some(event) = decode_log(address, &topics, &data) {
                    events.push(event);
                }
            }
        }
        Ok(Receipt {
            tx_hash,
            block_number,
            events,
        })
    }
}

impl ChainClient for JsonRpcClient {
    fn call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, ChainError> {
        let result = self.request(
            "eth_call",
            json!([{ "to": to.to_string(), "data": to_hex(data) }, "latest"]),
        )?;
        parse_hex_bytes(Some(&result))
    }

    fn send_transaction(&self, tx: &TxRequest) -> Result<Receipt, ChainError> {
        let mut params = json!({
            "from": tx.from.to_string(),
            "to": tx.to.to_string(),
            "data": to_hex(&tx.data),
        });
        if let Some(gas_price) = tx.gas_price {
            params["gasPrice"] = json!(format!("{gas_price:#x}"));
        }
        let result = self.request("eth_sendTransaction", json!([params]))?;
        let tx_hash = result
            .as_str()
            .ok_or_else(|| ChainError::Rpc("eth_sendTransaction returned no hash".into()))?
            .to_string();
        debug!(%tx_hash, "transaction submitted, awaiting receipt");

        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            let receipt = self.request("eth_getTransactionReceipt", json!([tx_hash]))?;
            if !receipt.is_null() {
                return self.receipt_from_json(&receipt);
            }
            std::thread::sleep(RECEIPT_POLL_INTERVAL);
        }
        Err(ChainError::Rpc(format!(
            "no receipt for {tx_hash} after {RECEIPT_POLL_ATTEMPTS} polls"
        )))
    }

    fn block_number(&self) -> Result<u64, ChainError> {
        let result = self.request("eth_blockNumber", json!([]))?;
        parse_hex_u64(Some(&result))
    }

    fn timestamp(&self) -> Result<u64, ChainError> {
        let result = self.request("eth_getBlockByNumber", json!(["latest", false]))?;
        parse_hex_u64(result.get("timestamp"))
    }

    fn advance_time(&self, secs: u64) -> Result<(), ChainError> {
        self.request("evm_increaseTime", json!([secs]))?;
        self.request("evm_mine", json!([]))?;
        Ok(())
    }

    fn mine(&self) -> Result<(), ChainError> {
        self.request("evm_mine", json!([]))?;
        Ok(())
    }
}

fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

fn parse_hex_bytes(value: Option<&Value>) -> Result<Vec<u8>, ChainError> {
    let s = value
        .and_then(Value::as_str)
        .ok_or_else(|| ChainError::Rpc("expected hex string".into()))?;
    hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| ChainError::Rpc(format!("bad hex {s:?}: {e}")))
}

fn parse_hex_u64(value: Option<&Value>) -> Result<u64, ChainError> {
    let s = value
        .and_then(Value::as_str)
        .ok_or_else(|| ChainError::Rpc("expected hex quantity".into()))?;
    u64::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|e| ChainError::Rpc(format!("bad quantity {s:?}: {e}")))
}

fn parse_b256(value: Option<&Value>) -> Result<B256, ChainError> {
    let bytes = parse_hex_bytes(value)?;
    B256::try_from(bytes.as_slice()).map_err(|_| ChainError::Rpc("expected 32-byte hash".into()))
}
