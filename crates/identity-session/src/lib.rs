//! OIDC session lifecycle client.
//!
//! This crate provides:
//! - `ProviderSettings`: fixed identity-provider configuration
//! - `ProviderGateway`: the capability seam to the external identity library
//! - `IdentitySessionClient`: protocol operation wrappers, session lifecycle
//!   events, expiry scheduling, and automatic silent renew

mod client;
mod error;
mod events;
mod gateway;
mod settings;

pub use client::IdentitySessionClient;
pub use error::{GatewayError, ProviderError, ProviderResult};
pub use events::{SessionEvent, SessionEvents};
pub use gateway::{ProviderGateway, SessionIdentity, SessionStatus};
pub use settings::{ProviderSettings, DEFAULT_AUTHORITY, DEFAULT_CLIENT_ID};
