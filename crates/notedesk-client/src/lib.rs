//! # NoteDesk Client
//!
//! Platform client used by the NoteDesk console.
//!
//! This crate provides the [`NoteSource`] abstraction the console's cache
//! layer fetches through, and [`XhsClient`], the cookie-authenticated HTTP
//! implementation that talks to the notes platform.
//!
//! ## Features
//!
//! - Cookie sessions with `a1` / `web_session` extraction for signing
//! - Pluggable request signing (`x-s` / `x-t` headers)
//! - Lenient normalization of note, follower, detail and comment payloads
//! - xsec token memo reused across list and detail requests
//! - Session handle with atomic replace, and JSON session persistence
//! - Image fetching for the console's image proxy
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use notedesk_client::{ClientConfig, NoSigner, NoteSource, XhsClient};
//!
//! let config = ClientConfig::builder().request_timeout_secs(10).build()?;
//! let client = XhsClient::new(config, "a1=...; web_session=...", Arc::new(NoSigner))?;
//!
//! let me = client.self_info().await?;
//! let notes = client.fetch_content_list(&me.user_id).await?;
//! ```

pub mod client;
pub mod error;
pub mod media;
pub mod parse;
pub mod session;
pub mod source;

// Re-exports
pub use client::{
    ClientConfig, ClientConfigBuilder, CookieJar, NoSigner, RequestSigner, SignServer,
    SignedHeaders, XhsClient, XhsClientFactory, XsecTokens,
};
pub use error::UpstreamError;
pub use media::{FetchedImage, ImageFetcher};
pub use session::{ActiveSession, Session, SessionRecord, SessionStore};
pub use source::{NoteSource, SourceFactory};

// Re-export notedesk_core for consumers
pub use notedesk_core;
