//! Wire payloads exchanged on the location destinations

use adigo_core::{Coordinate, UserLocation};
use serde::{Deserialize, Serialize};

/// Body sent to `/app/location/update`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinate> for LocationUpdate {
    fn from(c: Coordinate) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

/// Friend ids arrive as strings or as plain numbers depending on the server build
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FriendId {
    Text(String),
    Number(i64),
}

impl From<FriendId> for String {
    fn from(id: FriendId) -> Self {
        match id {
            FriendId::Text(s) => s,
            FriendId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FriendLocationEntry {
    id: FriendId,
    #[serde(alias = "latitude")]
    lat: f64,
    #[serde(alias = "longitude")]
    lng: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FriendsLocationPayload {
    List(Vec<FriendLocationEntry>),
    Envelope { friends: Vec<FriendLocationEntry> },
}

/// Parse a body from the friends location queue
///
/// Accepts a bare list of `{id, lat, lng}` or a `{"friends": [...]}`
/// envelope whose entries may spell out `latitude`/`longitude`.
pub fn parse_friend_locations(body: &str) -> Result<Vec<UserLocation>, serde_json::Error> {
    let entries = match serde_json::from_str::<FriendsLocationPayload>(body)? {
        FriendsLocationPayload::List(entries)
        | FriendsLocationPayload::Envelope { friends: entries } => entries,
    };

    Ok(entries
        .into_iter()
        .map(|e| UserLocation::new(e.id, e.lat, e.lng))
        .collect())
}
