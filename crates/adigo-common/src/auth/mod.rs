//! Token handling - persisted token pair and JWT claim inspection

mod jwt;
mod renewal;
mod token_store;

pub use jwt::{decode_unverified, is_token_expired, AccessClaims};
pub use renewal::{SessionRenewer, SharedSessionRenewer};
pub use token_store::{
    FileTokenStore, MemoryTokenStore, SharedTokenStore, TokenPair, TokenStore, TokenStoreError,
};
