//! Token refresh on 401

mod authenticator;
mod refresher;

pub use authenticator::{TokenAuthenticator, MAX_RESPONSE_COUNT};
pub use refresher::{HttpTokenRefresher, TokenRefresher};
