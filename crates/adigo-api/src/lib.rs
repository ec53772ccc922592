//! # adigo-api
//!
//! REST client for the Adigo backend.
//!
//! - `client`: HTTP client factory and the authenticated request pipeline
//! - `auth`: token-refresh authenticator and the `auth/reissue` refresher
//! - `dto`: request/response bodies and mappers to domain entities
//! - `endpoints`: one method per backend endpoint on [`ApiClient`]

pub mod auth;
pub mod client;
pub mod dto;
pub mod endpoints;
pub mod error;

pub use auth::{HttpTokenRefresher, TokenAuthenticator, TokenRefresher, MAX_RESPONSE_COUNT};
pub use client::{ApiClient, ApiClientBuilder};
pub use error::{ApiError, ApiResult};
