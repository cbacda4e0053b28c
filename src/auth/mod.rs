//! Bearer token issuance and validation.

mod token;

pub use token::{Claims, TokenError, TokenIssuer};
