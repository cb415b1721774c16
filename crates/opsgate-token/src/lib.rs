//! # opsgate-token
//!
//! Stateless session-credential handling for Opsgate.
//!
//! This crate provides functionality for:
//! - Decoding the three-segment wire format (codec, no trust implied)
//! - Signing and verifying credentials with HMAC-SHA256
//! - Validating claim expiry against wall-clock time
//! - The access decision gate evaluating a request end to end
//!
//! ## Trust model
//!
//! A credential is a compact `header.payload.signature` string. Claims
//! decoded from the payload are **untrusted** until the signature has
//! been recomputed over the encoded `header.payload` text and compared
//! equal (in constant time). Every protected request is evaluated
//! independently; there is no server-side session state.

pub mod claims;
pub mod codec;
pub mod error;
pub mod gate;
pub mod token;

pub use claims::Claims;
pub use codec::DecodedToken;
pub use error::TokenError;
pub use gate::{Decision, DenyReason, authorize, authorize_at};
pub use token::{SigningKey, TokenSigner, TokenVerifier};
