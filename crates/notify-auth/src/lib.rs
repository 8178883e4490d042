//! # notify-auth
//!
//! JWT verification. Tokens are issued by the upstream auth service; this
//! crate only validates them and extracts the caller's identity.

pub mod claims;
pub mod verifier;

pub use claims::Claims;
pub use verifier::JwtVerifier;
