//! Security subsystem.
//!
//! Only the demo token pair lives here. It signs and checks tokens for the
//! `/token` endpoints and protects nothing else.

pub mod token;

pub use token::{bearer_token, Claims, IssuedToken, TokenError, TokenIssuer};
