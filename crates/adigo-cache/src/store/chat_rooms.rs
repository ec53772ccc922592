//! Chat room store (schema only)

use adigo_core::{ChatRoom, ChatRoomRepository, RepoResult};
use async_trait::async_trait;
use dashmap::DashMap;

/// Cached chat rooms keyed by id
#[derive(Default)]
pub struct ChatRoomStore {
    rooms: DashMap<String, ChatRoom>,
}

impl ChatRoomStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatRoomRepository for ChatRoomStore {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<ChatRoom>> {
        Ok(self.rooms.get(id).map(|e| e.value().clone()))
    }

    async fn list(&self) -> RepoResult<Vec<ChatRoom>> {
        let mut all: Vec<ChatRoom> = self.rooms.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn upsert(&self, room: ChatRoom) -> RepoResult<()> {
        self.rooms.insert(room.id.clone(), room);
        Ok(())
    }

    async fn delete(&self, id: &str) -> RepoResult<()> {
        self.rooms.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_room_roundtrip() {
        let store = ChatRoomStore::new();
        store
            .upsert(ChatRoom {
                id: "r1".to_string(),
                target_user_id: "7".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
        store.delete("r1").await.unwrap();
        assert!(store.find_by_id("r1").await.unwrap().is_none());
    }
}
