//! Endpoint wrappers, grouped by backend controller

mod auth;
mod friend;
mod member;
mod push;
mod webauthn;
