//! Shortening gateways.
//!
//! A [`Gateway`] turns a long URL into a short alias using some external
//! service. The tracker only consumes the result; the alias algorithm lives
//! on the other side of this trait.

pub mod error;
pub mod gateway;
pub mod seq;
pub mod tinyurl;

pub use error::{GatewayError, Result, FALLBACK_MESSAGE};
pub use gateway::Gateway;
pub use seq::SeqGateway;
pub use tinyurl::{TinyUrlGateway, DEFAULT_ENDPOINT};
