//! User entity - a member of the Adigo service (the current user or a friend)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Account authority as issued by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Authority {
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[default]
    #[serde(rename = "ROLE_USER")]
    User,
}

impl Authority {
    /// Wire name of this authority
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ROLE_ADMIN",
            Self::User => "ROLE_USER",
        }
    }
}

impl std::str::FromStr for Authority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_ADMIN" => Ok(Self::Admin),
            "ROLE_USER" => Ok(Self::User),
            other => Err(DomainError::UnknownAuthority(other.to_string())),
        }
    }
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub authority: Authority,
    pub online: bool,
    pub last_seen: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: i64, email: String, nickname: String) -> Self {
        Self {
            id,
            email,
            nickname,
            profile_image: None,
            authority: Authority::User,
            online: false,
            last_seen: None,
        }
    }

    /// Check if the user has administrator authority
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.authority == Authority::Admin
    }

    /// Mark the user online
    pub fn mark_online(&mut self) {
        self.online = true;
        self.last_seen = Some(Utc::now());
    }

    /// Mark the user offline, keeping the last time they were seen
    pub fn mark_offline(&mut self) {
        if self.online {
            self.last_seen = Some(Utc::now());
        }
        self.online = false;
    }

    /// Update the nickname
    pub fn set_nickname(&mut self, nickname: String) {
        self.nickname = nickname;
    }

    /// Update the profile image reference
    pub fn set_profile_image(&mut self, profile_image: Option<String>) {
        self.profile_image = profile_image;
    }
}
