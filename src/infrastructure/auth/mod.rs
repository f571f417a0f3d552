//! Authentication adapters

mod static_token;

pub use static_token::{StaticTokenProvider, ACCOUNT_ENV, TOKEN_ENV};
