//! HTTP handlers for the console.

pub mod cache;
pub mod followers;
pub mod health;
pub mod metrics;
pub mod notes;
pub mod proxy;
pub mod publish;
pub mod response;
pub mod session;
