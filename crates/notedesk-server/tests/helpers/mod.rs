//! Test helpers for notedesk-server.

#![allow(dead_code, unused_imports)]

pub mod app;
pub mod client;
pub mod fake_source;

pub use app::{TestApp, wait_for, wait_for_runs};
pub use client::{TestClient, TestResponse};
pub use fake_source::{FakeFactory, FakeSource, detail, note};
