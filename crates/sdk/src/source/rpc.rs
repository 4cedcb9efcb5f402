use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::{Client, IntoUrl, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use ubet_model::Address;

use crate::abi::{self, selector};

use super::ReferralSource;

const JSONRPC_VERSION: &str = "2.0";
const LATEST: &str = "latest";

/// A [`ReferralSource`] reading the referral registry contract through an
/// EVM JSON-RPC endpoint.
#[derive(Debug)]
pub struct RpcReferralSource {
    url: Url,
    client: Client,
    registry: Address,
    next_id: AtomicU64,
}

impl RpcReferralSource {
    /// Create a new source for the given endpoint and registry contract.
    pub fn try_new(url: impl IntoUrl, registry: Address) -> crate::Result<Self> {
        let registry = Address::parse_evm(registry.as_str())?;
        Ok(Self {
            url: url.into_url()?,
            client: Client::new(),
            registry,
            next_id: AtomicU64::new(1),
        })
    }

    /// Use the given HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// The endpoint.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The registry contract.
    pub fn registry(&self) -> &Address {
        &self.registry
    }

    /// Send a JSON-RPC request.
    pub async fn request<P, T>(&self, method: &str, params: P) -> crate::Result<T>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        };
        tracing::trace!(%id, %method, "sending request");
        let response: Response<T> = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        response.into_result()
    }

    /// Execute a read-only call against the registry.
    pub async fn eth_call(&self, data: Vec<u8>) -> crate::Result<Vec<u8>> {
        let call = CallObject {
            to: self.registry.as_str(),
            data: format!("0x{}", hex::encode(data)),
        };
        let output: String = self.request("eth_call", (call, LATEST)).await?;
        abi::decode_hex(&output)
    }

    /// Get the chain ID of the endpoint.
    pub async fn chain_id(&self) -> crate::Result<u64> {
        let id: String = self.request("eth_chainId", [(); 0]).await?;
        let digits = id.strip_prefix("0x").unwrap_or(&id);
        u64::from_str_radix(digits, 16).map_err(crate::Error::transport)
    }

    /// Get the number of registered users.
    pub async fn total_registered(&self) -> crate::Result<u64> {
        let data = abi::encode_call(selector::TOTAL_REGISTERED, &[]);
        abi::decode_u64(&self.eth_call(data).await?)
    }

    /// Returns whether the user is registered.
    pub async fn check_if_registered(&self, user: &Address) -> crate::Result<bool> {
        let data = abi::encode_call(selector::CHECK_IF_REGISTERED, &[abi::encode_address(user)?]);
        abi::decode_bool(&self.eth_call(data).await?)
    }
}

impl ReferralSource for RpcReferralSource {
    async fn list_all_registered_users(&self) -> crate::Result<Vec<Address>> {
        let data = abi::encode_call(selector::GET_ALL_REGISTERED, &[]);
        let output = self
            .eth_call(data)
            .await
            .map_err(crate::Error::into_source_unavailable)?;
        abi::decode_address_array(&output).map_err(crate::Error::into_source_unavailable)
    }

    async fn get_referrer_of(&self, user: &Address) -> crate::Result<Option<Address>> {
        let lookup = async {
            let data = abi::encode_call(selector::GET_REFERRER_OF, &[abi::encode_address(user)?]);
            abi::decode_address(&self.eth_call(data).await?)
        };
        let referrer = lookup
            .await
            .map_err(|err| crate::Error::lookup_failed(user, err))?;
        Ok(referrer.non_zero())
    }
}

#[derive(Debug, Serialize)]
struct Request<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Serialize)]
struct CallObject<'a> {
    to: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct Response<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl<T> Response<T> {
    fn into_result(self) -> crate::Result<T> {
        match (self.result, self.error) {
            (_, Some(RpcError { code, message })) => Err(crate::Error::Rpc { code, message }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(crate::Error::transport("response without result")),
        }
    }
}
