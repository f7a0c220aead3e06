//! HTTP access
//!
//! Every outbound request goes through the [`HttpClient`] trait so the
//! handshake, schedule and polling logic can run against a fake in tests.

mod client;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{HttpClient, HttpResponse, NetError, ReqwestClient};
