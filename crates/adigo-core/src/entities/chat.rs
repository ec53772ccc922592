//! Chat room and chat bubble entities
//!
//! Schema only; no chat feature reads or writes these yet.

/// A one-to-one chat room with another user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoom {
    pub id: String,
    pub target_user_id: String,
}

/// A single message shown in a chat room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBubble {
    pub id: String,
    pub room_id: String,
    pub sender: String,
    pub message: String,
    pub kind: String,
}
