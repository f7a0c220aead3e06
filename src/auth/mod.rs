//! radiko authorization
//!
//! - `key`: partial-key derivation
//! - `headers`: the signed header set shared by a session
//! - `authorizer`: the auth1/auth2 handshake

pub mod authorizer;
pub mod headers;
pub mod key;

pub use authorizer::{AuthError, Authorizer};
pub use headers::SignedHeaders;
pub use key::derive_partial_key;
