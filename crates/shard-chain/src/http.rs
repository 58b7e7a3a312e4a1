//! HTTP-backed chain driver, talking to a sidecar/RPC-bridge endpoint that
//! fronts the actual blockchain (§4.B, §6 config env vars).

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use shard_types::{ChainTxId, ItemTokenId};
use tracing::warn;

use crate::driver::ContractKind;
use crate::error::ChainError;

/// Configuration for [`HttpChainDriver`] (§6 `CHAIN_RPC_URL`, `CHAIN_ID`,
/// per-contract address env vars).
#[derive(Debug, Clone)]
pub struct HttpChainConfig {
    /// Base URL of the chain RPC bridge.
    pub rpc_url: String,
    /// The chain id the bridge targets.
    pub chain_id: u64,
    /// Contract addresses, keyed by [`ContractKind`].
    pub contract_addresses: HashMap<ContractKind, String>,
    /// Bounded timeout applied to every call (§5 cancellation & timeouts).
    pub timeout: Duration,
    /// Maximum block window scanned per `rebuild_cache` request.
    pub max_block_window: u64,
}

impl HttpChainConfig {
    /// A config with a 5 second call timeout and a 2000-block rebuild
    /// window, suitable as a starting point in most deployments.
    #[must_use]
    pub fn new(rpc_url: impl Into<String>, chain_id: u64) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            chain_id,
            contract_addresses: HashMap::new(),
            timeout: Duration::from_secs(5),
            max_block_window: 2_000,
        }
    }

    /// Register a contract address for `kind`.
    #[must_use]
    pub fn with_contract(mut self, kind: ContractKind, address: impl Into<String>) -> Self {
        self.contract_addresses.insert(kind, address.into());
        self
    }
}

/// The live chain driver. Talks to `rpc_url` over HTTP and expects a JSON
/// request/response bridge rather than raw JSON-RPC.
pub struct HttpChainDriver {
    client: reqwest::Client,
    config: HttpChainConfig,
}

#[derive(Deserialize)]
struct BalanceResponse {
    balance: u64,
}

#[derive(Deserialize)]
struct TxResponse {
    #[serde(default)]
    ok: bool,
}

#[derive(Deserialize)]
struct NextIdResponse {
    next_id: u64,
}

impl HttpChainDriver {
    /// Build a driver from `config`.
    #[must_use]
    pub fn new(config: HttpChainConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn contract_address(&self, kind: ContractKind) -> String {
        self.config
            .contract_addresses
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    async fn call_json<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ChainError> {
        let url = format!("{}{path}", self.config.rpc_url);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = tokio::time::timeout(self.config.timeout, request.send())
            .await
            .map_err(|_elapsed| ChainError::Timeout(self.config.timeout))?
            .map_err(|err| ChainError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_owned());
            return Err(ChainError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| ChainError::Parse(err.to_string()))
    }

    /// Read a wallet's gold balance, in copper.
    pub async fn gold_balance(&self, address: &str) -> Result<u64, ChainError> {
        let path = format!(
            "/contracts/{}/balance/{address}?chainId={}",
            self.contract_address(ContractKind::Gold),
            self.config.chain_id
        );
        let resp: BalanceResponse = self.call_json(reqwest::Method::GET, &path, None).await?;
        Ok(resp.balance)
    }

    /// Read a wallet's balance of a specific item token.
    pub async fn item_balance(
        &self,
        address: &str,
        token_id: ItemTokenId,
    ) -> Result<u64, ChainError> {
        let path = format!(
            "/contracts/{}/balance/{address}/{token_id}?chainId={}",
            self.contract_address(ContractKind::Item),
            self.config.chain_id
        );
        let resp: BalanceResponse = self.call_json(reqwest::Method::GET, &path, None).await?;
        Ok(resp.balance)
    }

    /// Mint copper to a wallet.
    pub async fn mint_gold(&self, address: &str, copper: u64) -> Result<ChainTxId, ChainError> {
        let path = format!("/contracts/{}/mint", self.contract_address(ContractKind::Gold));
        let body = serde_json::json!({ "to": address, "amount": copper });
        let resp: TxResponse = self.call_json(reqwest::Method::POST, &path, Some(body)).await?;
        confirm(resp)
    }

    /// Mint a quantity of an item token to a wallet.
    pub async fn mint_item(
        &self,
        address: &str,
        token_id: ItemTokenId,
        quantity: u64,
    ) -> Result<ChainTxId, ChainError> {
        let path = format!("/contracts/{}/mint", self.contract_address(ContractKind::Item));
        let body = serde_json::json!({ "to": address, "tokenId": token_id, "quantity": quantity });
        let resp: TxResponse = self.call_json(reqwest::Method::POST, &path, Some(body)).await?;
        confirm(resp)
    }

    /// Burn a quantity of an item token held by a wallet.
    pub async fn burn_item(
        &self,
        address: &str,
        token_id: ItemTokenId,
        quantity: u64,
    ) -> Result<ChainTxId, ChainError> {
        let path = format!("/contracts/{}/burn", self.contract_address(ContractKind::Item));
        let body = serde_json::json!({ "from": address, "tokenId": token_id, "quantity": quantity });
        let resp: TxResponse = self.call_json(reqwest::Method::POST, &path, Some(body)).await?;
        confirm(resp)
    }

    /// Transfer a quantity of an item token from one wallet to another.
    pub async fn transfer_item(
        &self,
        from: &str,
        to: &str,
        token_id: ItemTokenId,
        quantity: u64,
    ) -> Result<ChainTxId, ChainError> {
        let path = format!("/contracts/{}/transfer", self.contract_address(ContractKind::Item));
        let body =
            serde_json::json!({ "from": from, "to": to, "tokenId": token_id, "quantity": quantity });
        let resp: TxResponse = self.call_json(reqwest::Method::POST, &path, Some(body)).await?;
        confirm(resp)
    }

    /// The next unused sequence id the given contract would assign.
    pub async fn next_id(&self, contract: ContractKind) -> Result<u64, ChainError> {
        let path = format!("/contracts/{}/next-id", self.contract_address(contract));
        let resp: NextIdResponse = self.call_json(reqwest::Method::GET, &path, None).await?;
        Ok(resp.next_id)
    }

    /// Rebuild the in-memory balance projection for `contract` by scanning
    /// historical events in bounded block windows.
    pub async fn rebuild_cache(&self, contract: ContractKind) -> Result<(), ChainError> {
        let path = format!("/contracts/{}/rebuild", self.contract_address(contract));
        let body = serde_json::json!({ "maxBlockWindow": self.config.max_block_window });
        let _resp: TxResponse = self.call_json(reqwest::Method::POST, &path, Some(body)).await?;
        warn!(contract = ?contract, "chain cache rebuild requested");
        Ok(())
    }
}

fn confirm(resp: TxResponse) -> Result<ChainTxId, ChainError> {
    if resp.ok {
        Ok(ChainTxId::new())
    } else {
        Err(ChainError::BadStatus {
            status: 200,
            body: "chain bridge reported ok=false".to_owned(),
        })
    }
}
