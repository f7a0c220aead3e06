//! Two-step radiko handshake

use super::headers::SignedHeaders;
use super::key::derive_partial_key;
use crate::config::AuthConfig;
use crate::net::{HttpClient, HttpResponse, NetError};
use std::sync::Arc;
use thiserror::Error;
use url::Url;

const RESPONSE_AUTH_TOKEN: &str = "X-Radiko-AuthToken";
const RESPONSE_KEY_LENGTH: &str = "X-Radiko-KeyLength";
const RESPONSE_KEY_OFFSET: &str = "X-Radiko-KeyOffset";

/// Handshake failures. All of them end the session.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid auth endpoint {0}: {1}")]
    InvalidEndpoint(String, url::ParseError),

    #[error("Auth request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: NetError,
    },

    #[error("Auth request to {endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Auth response from {endpoint} is missing header {header}")]
    MissingHeader { endpoint: String, header: String },

    #[error("Auth response header {header} is not an integer: {value:?}")]
    InvalidHeader { header: String, value: String },

    #[error("Key window offset={offset} length={length} is outside the auth key")]
    KeyOutOfRange { offset: usize, length: usize },

    #[error("Auth response from {endpoint} yields an empty token or partial key")]
    EmptyCredentials { endpoint: String },
}

/// Runs the auth1/auth2 exchange against the configured endpoints
pub struct Authorizer {
    client: Arc<dyn HttpClient>,
    config: AuthConfig,
}

impl Authorizer {
    pub fn new(client: Arc<dyn HttpClient>, config: AuthConfig) -> Self {
        Self { client, config }
    }

    /// Perform both handshakes and return the signed header set
    pub async fn authorize(&self) -> Result<SignedHeaders, AuthError> {
        let baseline = SignedHeaders::baseline(&self.config.user_agent, &self.config.area_id);

        let auth1 = self.call(&self.config.auth1_url, &baseline).await?;
        let token = required_header(&auth1, &self.config.auth1_url, RESPONSE_AUTH_TOKEN)?;
        let length = integer_header(&auth1, &self.config.auth1_url, RESPONSE_KEY_LENGTH)?;
        let offset = integer_header(&auth1, &self.config.auth1_url, RESPONSE_KEY_OFFSET)?;

        let partial_key = derive_partial_key(offset, length)
            .ok_or(AuthError::KeyOutOfRange { offset, length })?;
        tracing::debug!("Derived partial key from offset={} length={}", offset, length);

        let signed = baseline.signed(token, &partial_key);
        if !signed.is_signed() {
            return Err(AuthError::EmptyCredentials {
                endpoint: self.config.auth1_url.clone(),
            });
        }
        let auth2 = self.call(&self.config.auth2_url, &signed).await?;
        tracing::debug!("auth2 response: {}", auth2.text().trim());

        tracing::info!("Authorized for area {}", signed.area_id());
        Ok(signed)
    }

    async fn call(&self, endpoint: &str, headers: &SignedHeaders) -> Result<HttpResponse, AuthError> {
        let url = Url::parse(endpoint)
            .map_err(|e| AuthError::InvalidEndpoint(endpoint.to_string(), e))?;

        let response = self
            .client
            .get(&url, &headers.pairs())
            .await
            .map_err(|source| {
                tracing::warn!("Auth request to {} failed: {}", endpoint, source);
                AuthError::Transport {
                    endpoint: endpoint.to_string(),
                    source,
                }
            })?;

        if !response.is_ok() {
            tracing::warn!(
                "Auth request to {} returned HTTP {}: {}",
                endpoint,
                response.status,
                response.text().trim()
            );
            return Err(AuthError::Status {
                endpoint: endpoint.to_string(),
                status: response.status,
            });
        }

        tracing::debug!("Auth request to {} succeeded", endpoint);
        Ok(response)
    }
}

fn required_header<'a>(
    response: &'a HttpResponse,
    endpoint: &str,
    header: &str,
) -> Result<&'a str, AuthError> {
    response
        .header(header)
        .ok_or_else(|| AuthError::MissingHeader {
            endpoint: endpoint.to_string(),
            header: header.to_string(),
        })
}

fn integer_header(response: &HttpResponse, endpoint: &str, header: &str) -> Result<usize, AuthError> {
    let value = required_header(response, endpoint, header)?;
    value.trim().parse().map_err(|_| AuthError::InvalidHeader {
        header: header.to_string(),
        value: value.to_string(),
    })
}
