//! Table QR sessions
//!
//! - [`token`]: signed, time-bound table credentials
//! - [`store`]: the single current token per table
//! - [`issuer`]: generate / bulk regenerate
//! - [`verifier`]: guest scan verification
//! - [`render`]: URL, PNG and PDF artifacts

pub mod issuer;
pub mod render;
pub mod store;
pub mod token;
pub mod verifier;

pub use issuer::{BulkRegeneration, TokenIssuer};
pub use store::TableTokenStore;
pub use token::QrTokenSigner;
pub use verifier::{TableVerifier, VerifiedTable, VerifyError, VerifyFailure};
