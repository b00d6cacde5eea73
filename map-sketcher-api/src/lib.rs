//! Remote resource client for the GIS backend.
//!
//! One [`ApiClient`] serves all three entity collections plus the auth
//! endpoints. Every operation is a single attempt over the injected
//! [`Transport`]: no retries, no caching, no de-duplication of in-flight
//! requests. A screen that wants fresh data fetches again.

mod auth;
mod client;
mod config;
mod error;
mod session;
mod transport;

pub use auth::validate_registration;
pub use client::{ApiClient, Collection};
pub use config::ApiConfig;
pub use error::ApiError;
pub use session::{MemoryStore, SessionStore};
pub use transport::{HttpRequest, HttpResponse, Method, Transport};

#[cfg(target_arch = "wasm32")]
pub use session::BrowserStore;
#[cfg(target_arch = "wasm32")]
pub use transport::FetchTransport;

#[cfg(test)]
mod tests;
