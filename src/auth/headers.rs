//! Signed request headers
//!
//! Produced once by the handshake and then shared read-only by every later
//! request of a session.

use serde::{Deserialize, Serialize};

pub const HEADER_USER_AGENT: &str = "User-Agent";
pub const HEADER_ACCEPT: &str = "Accept";
pub const HEADER_APP: &str = "X-Radiko-App";
pub const HEADER_APP_VERSION: &str = "X-Radiko-App-Version";
pub const HEADER_USER: &str = "X-Radiko-User";
pub const HEADER_DEVICE: &str = "X-Radiko-Device";
pub const HEADER_AUTH_TOKEN: &str = "X-Radiko-AuthToken";
pub const HEADER_PARTIAL_KEY: &str = "X-Radiko-Partialkey";
pub const HEADER_AREA_ID: &str = "X-Radiko-AreaId";
pub const HEADER_CONNECTION: &str = "Connection";

/// Header set for the radiko API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedHeaders {
    user_agent: String,
    area_id: String,
    auth_token: String,
    partial_key: String,
    keep_alive: bool,
}

impl SignedHeaders {
    /// Headers for handshake-1: identity only, token and key empty
    pub fn baseline(user_agent: &str, area_id: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            area_id: area_id.to_string(),
            auth_token: String::new(),
            partial_key: String::new(),
            keep_alive: false,
        }
    }

    /// Copy of these headers carrying the handshake credentials
    pub fn signed(&self, auth_token: &str, partial_key: &str) -> Self {
        Self {
            auth_token: auth_token.to_string(),
            partial_key: partial_key.to_string(),
            ..self.clone()
        }
    }

    /// Copy that also asks for a persistent connection
    pub fn with_keep_alive(&self) -> Self {
        Self {
            keep_alive: true,
            ..self.clone()
        }
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn partial_key(&self) -> &str {
        &self.partial_key
    }

    pub fn area_id(&self) -> &str {
        &self.area_id
    }

    /// True once both handshake credentials are present
    pub fn is_signed(&self) -> bool {
        !self.auth_token.is_empty() && !self.partial_key.is_empty()
    }

    /// Header name/value pairs in a fixed order
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = [
            (HEADER_USER_AGENT, self.user_agent.as_str()),
            (HEADER_ACCEPT, "*/*"),
            (HEADER_APP, "pc_html5"),
            (HEADER_APP_VERSION, "0.0.1"),
            (HEADER_USER, "dummy_user"),
            (HEADER_DEVICE, "pc"),
            (HEADER_AUTH_TOKEN, self.auth_token.as_str()),
            (HEADER_PARTIAL_KEY, self.partial_key.as_str()),
            (HEADER_AREA_ID, self.area_id.as_str()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

        if self.keep_alive {
            pairs.push((HEADER_CONNECTION.to_string(), "keep-alive".to_string()));
        }
        pairs
    }

    /// Serialize as `Name: value` lines, each terminated by CRLF, the form
    /// ffmpeg's `-headers` option takes.
    pub fn to_header_block(&self) -> String {
        self.pairs()
            .iter()
            .map(|(name, value)| format!("{}: {}\r\n", name, value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_baseline_is_unsigned() {
        let headers = SignedHeaders::baseline("ua", "JP13");
        assert!(!headers.is_signed());

        let pairs = headers.pairs();
        assert_eq!(value(&pairs, HEADER_AUTH_TOKEN), Some(""));
        assert_eq!(value(&pairs, HEADER_PARTIAL_KEY), Some(""));
        assert_eq!(value(&pairs, HEADER_AREA_ID), Some("JP13"));
        assert_eq!(value(&pairs, HEADER_CONNECTION), None);
    }

    #[test]
    fn test_signed_leaves_baseline_untouched() {
        let baseline = SignedHeaders::baseline("ua", "JP13");
        let signed = baseline.signed("token", "key");

        assert!(signed.is_signed());
        assert!(!baseline.is_signed());
        assert_eq!(signed.auth_token(), "token");
        assert_eq!(signed.partial_key(), "key");
    }

    #[test]
    fn test_header_block() {
        let headers = SignedHeaders::baseline("ua", "JP13")
            .signed("tok", "pk")
            .with_keep_alive();
        let block = headers.to_header_block();

        assert!(block.starts_with("User-Agent: ua\r\n"));
        assert!(block.contains("X-Radiko-AuthToken: tok\r\n"));
        assert!(block.contains("X-Radiko-Partialkey: pk\r\n"));
        assert!(block.ends_with("Connection: keep-alive\r\n"));
        assert_eq!(block.matches("\r\n").count(), 10);
    }
}
