//! JSON-RPC access to a chain.

use {
    crate::{
        chain::ChainId,
        error::{ClientError, Result},
        primitives::{from_hex, parse_quantity, to_hex, to_quantity, Address, TxHash},
    },
    async_trait::async_trait,
    log::*,
    serde::Deserialize,
    serde_json::{json, Value},
    std::{
        sync::atomic::{AtomicU64, Ordering},
        time::Duration,
    },
};

impl std::fmt::Debug for dyn ChainRpc + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ChainRpc")
    }
}

/// Read access to one chain. [`HttpChainRpc`] is the production
/// implementation; tests substitute in-memory nodes.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// `eth_call` against the latest block.
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>>;
    async fn block_number(&self) -> Result<u64>;
    async fn gas_price(&self) -> Result<u128>;
    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u128>;
    /// `None` while the transaction is not yet mined.
    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>>;
}

/// A fully specified transaction handed to the wallet for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Vec<u8>,
    pub value: u128,
    /// `None` sends without a gas limit and lets the wallet decide.
    pub gas: Option<u128>,
    pub gas_price: Option<u128>,
    pub chain_id: ChainId,
}

impl TransactionRequest {
    /// The JSON-RPC transaction object.
    pub fn to_json(&self) -> Value {
        let mut object = json!({
            "from": self.from.to_string(),
            "to": self.to.to_string(),
            "data": to_hex(&self.data),
            "value": to_quantity(self.value),
            "chainId": to_quantity(u128::from(self.chain_id.0)),
        });
        if let Some(gas) = self.gas {
            object["gas"] = json!(to_quantity(gas));
        }
        if let Some(gas_price) = self.gas_price {
            object["gasPrice"] = json!(to_quantity(gas_price));
        }
        object
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    /// 1 for success, 0 for revert.
    pub status: u64,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status == 1
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: TxHash,
    block_number: Option<String>,
    status: Option<String>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorObject>,
}

/// JSON-RPC over HTTP with ordered endpoint fallback. A request goes to the
/// first endpoint; transport failures and timeouts move on to the next one.
/// A JSON-RPC error object from a node is returned as is.
#[derive(Debug)]
pub struct HttpChainRpc {
    chain_id: ChainId,
    endpoints: Vec<String>,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpChainRpc {
    pub fn new(chain_id: ChainId, endpoints: Vec<String>, timeout: Duration) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(ClientError::NoEndpoints(chain_id));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            chain_id,
            endpoints,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let mut last_error = None;
        for endpoint in &self.endpoints {
            match self.send(endpoint, &body).await {
                Ok(result) => return Ok(result),
                Err(err @ ClientError::Rpc { .. }) => {
                    debug!("{method} on chain {} via {endpoint}: {err}", self.chain_id);
                    return Err(err);
                }
                Err(err) => {
                    warn!(
                        "{method} on chain {} via {endpoint} failed: {err}",
                        self.chain_id
                    );
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or(ClientError::NoEndpoints(self.chain_id)))
    }

    async fn send(&self, endpoint: &str, body: &Value) -> Result<Value> {
        let response: RpcResponse = self
            .client
            .post(endpoint)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if let Some(error) = response.error {
            return Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(response.result)
    }

    async fn request_quantity(&self, method: &str, params: Value) -> Result<u128> {
        let result = self.request(method, params).await?;
        let text = result
            .as_str()
            .ok_or_else(|| ClientError::Decode(format!("{method} returned {result}")))?;
        parse_quantity(text)
    }
}

#[async_trait]
impl ChainRpc for HttpChainRpc {
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        let params = json!([{ "to": to.to_string(), "data": to_hex(&data) }, "latest"]);
        let result = self.request("eth_call", params).await?;
        let text = result
            .as_str()
            .ok_or_else(|| ClientError::Decode(format!("eth_call returned {result}")))?;
        from_hex(text)
    }

    async fn block_number(&self) -> Result<u64> {
        let number = self.request_quantity("eth_blockNumber", json!([])).await?;
        u64::try_from(number)
            .map_err(|_| ClientError::Decode(format!("block number {number} out of range")))
    }

    async fn gas_price(&self) -> Result<u128> {
        self.request_quantity("eth_gasPrice", json!([])).await
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u128> {
        self.request_quantity("eth_estimateGas", json!([tx.to_json()]))
            .await
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>> {
        let result = self
            .request("eth_getTransactionReceipt", json!([hash.to_string()]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        let receipt: RpcReceipt = serde_json::from_value(result)?;
        // Pending receipts on some nodes carry no block number yet.
        let Some(block_number) = receipt.block_number else {
            return Ok(None);
        };
        let block_number = parse_quantity(&block_number)?;
        let status = receipt
            .status
            .as_deref()
            .map(parse_quantity)
            .transpose()?
            .unwrap_or(1);
        Ok(Some(TransactionReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number: u64::try_from(block_number).map_err(|_| {
                ClientError::Decode(format!("block number {block_number} out of range"))
            })?,
            status: u64::try_from(status)
                .map_err(|_| ClientError::Decode(format!("status {status} out of range")))?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        assert_matches::assert_matches,
        jsonrpc_core::{Error, ErrorCode, IoHandler, Params},
        jsonrpc_http_server::{Server, ServerBuilder},
        std::{
            net::SocketAddr,
            sync::{
                atomic::{AtomicUsize, Ordering},
                Arc,
            },
        },
    };

    const HASH: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";

    fn start_server(io: IoHandler) -> (Server, SocketAddr) {
        let server = ServerBuilder::new(io)
            .threads(1)
            .start_http(&"127.0.0.1:0".parse().unwrap())
            .expect("start mock rpc server");
        let address = *server.address();
        (server, address)
    }

    fn mock_node() -> IoHandler {
        let mut io = IoHandler::default();
        io.add_sync_method("eth_blockNumber", |_params: Params| Ok(Value::String("0x2a".into())));
        io.add_sync_method("eth_gasPrice", |_params: Params| {
            Ok(Value::String("0x3b9aca00".into()))
        });
        io.add_sync_method("eth_call", |params: Params| {
            let params: Vec<Value> = params.parse()?;
            let data = params[0]["data"].as_str().unwrap_or_default().to_string();
            // Echo the calldata back as return data.
            Ok(Value::String(data))
        });
        io.add_sync_method("eth_estimateGas", |params: Params| {
            let params: Vec<Value> = params.parse()?;
            if params[0]["gasPrice"].is_null() {
                return Err(Error::invalid_params("missing gasPrice"));
            }
            Ok(Value::String("0x5208".into()))
        });
        io.add_sync_method("eth_getTransactionReceipt", |params: Params| {
            let params: Vec<String> = params.parse()?;
            if params[0] == HASH {
                Ok(json!({
                    "transactionHash": HASH,
                    "blockNumber": "0x29",
                    "status": "0x0",
                }))
            } else {
                Ok(Value::Null)
            }
        });
        io
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_node_methods() {
        let (_server, address) = start_server(mock_node());
        let rpc = HttpChainRpc::new(
            ChainId::BSC,
            vec![format!("http://{address}")],
            Duration::from_secs(5),
        )
        .unwrap();

        runtime().block_on(async {
            assert_eq!(rpc.block_number().await.unwrap(), 42);
            assert_eq!(rpc.gas_price().await.unwrap(), 1_000_000_000);
            assert_eq!(
                rpc.call(Address::new([1; 20]), vec![0xde, 0xad]).await.unwrap(),
                vec![0xde, 0xad]
            );

            let tx = TransactionRequest {
                from: Address::new([1; 20]),
                to: Address::new([2; 20]),
                data: vec![],
                value: 0,
                gas: None,
                gas_price: Some(5),
                chain_id: ChainId::BSC,
            };
            assert_eq!(rpc.estimate_gas(&tx).await.unwrap(), 21_000);
            let without_price = TransactionRequest {
                gas_price: None,
                ..tx
            };
            assert_matches!(
                rpc.estimate_gas(&without_price).await,
                Err(ClientError::Rpc { code: -32602, .. })
            );

            let receipt = rpc
                .transaction_receipt(HASH.parse().unwrap())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(receipt.block_number, 41);
            assert!(!receipt.succeeded());
            assert_eq!(rpc.transaction_receipt(TxHash::new([2; 32])).await.unwrap(), None);
        });
    }

    fn unreachable_endpoint() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{address}")
    }

    #[test]
    fn test_falls_back_to_next_endpoint() {
        let (_server, address) = start_server(mock_node());
        let rpc = HttpChainRpc::new(
            ChainId::ETHEREUM,
            vec![unreachable_endpoint(), format!("http://{address}")],
            Duration::from_secs(5),
        )
        .unwrap();
        let number = runtime().block_on(rpc.block_number()).unwrap();
        assert_eq!(number, 42);
    }

    #[test]
    fn test_node_error_is_not_retried() {
        let counting_node = |calls: Arc<AtomicUsize>| {
            let mut io = IoHandler::default();
            io.add_sync_method("eth_call", move |_params: Params| {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error {
                    code: ErrorCode::ServerError(3),
                    message: "execution reverted".to_string(),
                    data: None,
                })
            });
            io
        };
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));
        let (_first, first_address) = start_server(counting_node(first_calls.clone()));
        let (_second, second_address) = start_server(counting_node(second_calls.clone()));

        let rpc = HttpChainRpc::new(
            ChainId::BSC,
            vec![
                format!("http://{first_address}"),
                format!("http://{second_address}"),
            ],
            Duration::from_secs(5),
        )
        .unwrap();
        assert_matches!(
            runtime().block_on(rpc.call(Address::new([1; 20]), vec![0x01])),
            Err(ClientError::Rpc { code: 3, message }) if message == "execution reverted"
        );
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_all_endpoints_unreachable_returns_last_error() {
        let rpc = HttpChainRpc::new(
            ChainId::BSC,
            vec![unreachable_endpoint(), unreachable_endpoint()],
            Duration::from_secs(5),
        )
        .unwrap();
        assert_matches!(runtime().block_on(rpc.gas_price()), Err(ClientError::Http(_)));
    }

    #[test]
    fn test_requires_endpoints() {
        assert_matches!(
            HttpChainRpc::new(ChainId::BSC, vec![], Duration::from_secs(1)),
            Err(ClientError::NoEndpoints(ChainId::BSC))
        );
    }

    #[test]
    fn test_transaction_json() {
        let tx = TransactionRequest {
            from: Address::new([1; 20]),
            to: Address::new([2; 20]),
            data: vec![0xab],
            value: 0,
            gas: Some(100),
            gas_price: None,
            chain_id: ChainId::BSC,
        };
        let object = tx.to_json();
        assert_eq!(object["data"], "0xab");
        assert_eq!(object["gas"], "0x64");
        assert_eq!(object["chainId"], "0x38");
        assert!(object.get("gasPrice").is_none());
    }
}
