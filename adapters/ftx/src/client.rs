use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use venuelink_core::config::FtxConfig;
use venuelink_core::{Result, VenueCredentials, VenueLinkError};
use venuelink_monitoring::StructuredLogger;

use crate::gateway::RequestGateway;
use crate::model::{BalanceRow, Envelope, OrderRow, PlaceOrderPayload};

const HEADER_KEY: &str = "FTX-KEY";
const HEADER_TIMESTAMP: &str = "FTX-TS";
const HEADER_SIGNATURE: &str = "FTX-SIGN";
const HEADER_SUBACCOUNT: &str = "FTX-SUBACCOUNT";

/// reqwest-backed [`RequestGateway`] signing every request with the account's
/// API secret.
#[derive(Debug)]
pub struct FtxRestClient {
    client: Client,
    base_url: Url,
    credentials: VenueCredentials,
    logger: StructuredLogger,
}

impl FtxRestClient {
    pub fn new(config: &FtxConfig, logger: StructuredLogger) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| VenueLinkError::InvalidData(format!("Invalid URL: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            credentials: config.credentials(),
            logger,
        })
    }

    pub fn subaccount(&self) -> Option<&str> {
        self.credentials.subaccount.as_deref()
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<Envelope<T>> {
        let url = self.build_url(endpoint, query)?;
        let timestamp = chrono::Utc::now().timestamp_millis();

        // the signed path includes the query string
        let path = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };
        let payload = body.as_deref().unwrap_or("");
        let signature = sign(&self.credentials.secret_key, timestamp, method.as_str(), &path, payload)?;

        debug!("Making {} request to: {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(HEADER_KEY, &self.credentials.api_key)
            .header(HEADER_TIMESTAMP, timestamp.to_string())
            .header(HEADER_SIGNATURE, signature);

        if let Some(subaccount) = &self.credentials.subaccount {
            request = request.header(HEADER_SUBACCOUNT, subaccount);
        }

        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VenueLinkError::Transport(e.to_string()))?;

        self.logger
            .log_exchange_request("ftx", endpoint, method.as_str(), Some(response.status().as_u16()));

        self.handle_response(response).await
    }

    fn build_url(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| VenueLinkError::InvalidData(format!("Invalid URL: {}", e)))?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<Envelope<T>> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| VenueLinkError::Transport(e.to_string()))?;

        // FTX answers most failures with a 4xx carrying an envelope; decode it
        // so the caller sees the venue's verdict
        match serde_json::from_str::<Envelope<T>>(&text) {
            Ok(envelope) => {
                if !status.is_success() {
                    warn!("HTTP error {}: {}", status, envelope.error.as_deref().unwrap_or(""));
                }
                Ok(envelope)
            }
            Err(e) => {
                debug!("Response body: {}", text);
                Err(VenueLinkError::ResponseParse(format!(
                    "HTTP {}: body is not an FTX envelope: {}",
                    status, e
                )))
            }
        }
    }
}

#[async_trait]
impl RequestGateway for FtxRestClient {
    async fn balances(&self) -> Result<Envelope<Vec<BalanceRow>>> {
        self.request(Method::GET, "/api/wallet/balances", &[], None).await
    }

    async fn place_order(&self, payload: &PlaceOrderPayload) -> Result<Envelope<OrderRow>> {
        let body = serde_json::to_string(payload)?;
        self.request(Method::POST, "/api/orders", &[], Some(body)).await
    }

    async fn open_orders(&self, market: &str) -> Result<Envelope<Vec<OrderRow>>> {
        self.request(Method::GET, "/api/orders", &[("market", market)], None)
            .await
    }
}

/// Hex HMAC-SHA256 over `timestamp + METHOD + path + body`.
pub fn sign(secret: &str, timestamp: i64, method: &str, path: &str, body: &str) -> Result<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| VenueLinkError::Authentication(e.to_string()))?;

    mac.update(timestamp.to_string().as_bytes());
    mac.update(method.to_uppercase().as_bytes());
    mac.update(path.as_bytes());
    mac.update(body.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}
