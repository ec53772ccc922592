//! `member/friend/*` endpoints

use adigo_core::User;
use reqwest::Url;

use crate::client::ApiClient;
use crate::dto::{FriendRequestReply, FriendshipRequestLookup, UserDto};
use crate::error::{ApiError, ApiResult};

impl ApiClient {
    /// `GET member/friend/list`
    pub async fn friends(&self) -> ApiResult<Vec<User>> {
        let friends: Vec<UserDto> = self
            .call(|http| http.get(self.url("member/friend/list")))
            .await?
            .data
            .unwrap_or_default();
        Ok(friends.into_iter().map(User::from).collect())
    }

    /// `POST member/friend/{email}` - send a friend request
    pub async fn add_friend(&self, email: &str) -> ApiResult<()> {
        let url = self.friend_url(email)?;
        self.call::<serde_json::Value, _>(|http| http.post(url.clone()))
            .await?;
        tracing::debug!(friend = %email, "Friend request sent");
        Ok(())
    }

    /// `DELETE member/friend/{email}`
    pub async fn delete_friend(&self, email: &str) -> ApiResult<()> {
        let url = self.friend_url(email)?;
        self.call::<serde_json::Value, _>(|http| http.delete(url.clone()))
            .await?;
        tracing::debug!(friend = %email, "Friend removed");
        Ok(())
    }

    /// `GET member/friend/lookup` - pending requests addressed to me
    pub async fn friend_requests(&self) -> ApiResult<Vec<FriendshipRequestLookup>> {
        Ok(self
            .call(|http| http.get(self.url("member/friend/lookup")))
            .await?
            .data
            .unwrap_or_default())
    }

    /// `POST member/friend/reply`
    pub async fn reply_friend_request(&self, requester_email: &str, accept: bool) -> ApiResult<()> {
        let reply = FriendRequestReply {
            requester_email: requester_email.to_string(),
            accept,
        };
        self.call::<serde_json::Value, _>(|http| {
            http.post(self.url("member/friend/reply")).json(&reply)
        })
        .await?;
        Ok(())
    }

    /// `member/friend/{email}` with the email as one escaped path segment
    fn friend_url(&self, email: &str) -> ApiResult<Url> {
        let mut url = Url::parse(&self.url("member/friend"))
            .map_err(|e| ApiError::Config(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Config("base URL cannot carry a path".to_string()))?
            .push(email);
        Ok(url)
    }
}
