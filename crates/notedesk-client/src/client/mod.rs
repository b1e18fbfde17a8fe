//! Notes platform HTTP client.
//!
//! This module provides the cookie-authenticated client and the pieces it is
//! built from.
//!
//! # Components
//!
//! - [`XhsClient`] - [`NoteSource`](crate::NoteSource) over the platform web API
//! - [`XhsClientFactory`] - builds clients at login, sharing one pool
//! - [`RequestSigner`] - `x-s`/`x-t` header producers
//! - [`XsecTokens`] - per-note token memo

mod config;
mod cookie;
mod factory;
mod http;
mod sign;
mod tokens;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use cookie::CookieJar;
pub use factory::XhsClientFactory;
pub use http::{XhsClient, build_http_client};
pub use sign::{NoSigner, RequestSigner, SignServer, SignedHeaders};
pub use tokens::{TOKEN_LEN, XsecTokens, generate_token};
