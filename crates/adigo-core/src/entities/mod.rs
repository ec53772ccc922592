//! Domain entities - objects mirrored from the Adigo server

mod chat;
mod user;
mod user_location;

pub use chat::{ChatBubble, ChatRoom};
pub use user::{Authority, User};
pub use user_location::UserLocation;
