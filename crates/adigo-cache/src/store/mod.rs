//! In-memory repository implementations

mod chat_rooms;
mod locations;
mod users;

pub use chat_rooms::ChatRoomStore;
pub use locations::UserLocationStore;
pub use users::UserStore;
