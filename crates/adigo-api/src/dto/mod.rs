//! Data transfer objects for the REST API
//!
//! This module provides:
//! - Request DTOs with validation, checked before anything is sent
//! - Response DTOs wrapped in the server's `ApiResponse` envelope
//! - Mappers from response DTOs to domain entities

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AssertionResultRequest, FriendRequestReply, LoginRequest, NicknameUpdateRequest,
    PushTokenRequest, ReissueRequest, SignUpRequest,
};
pub use responses::{
    ApiResponse, AssertionOptions, DuplicatedEmail, DuplicatedNumber, FriendshipRequestLookup,
    SignUpResult, SmsResult, UserDto,
};
