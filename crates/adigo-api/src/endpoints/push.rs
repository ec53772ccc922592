//! `push/*` endpoints

use validator::Validate;

use crate::client::ApiClient;
use crate::dto::PushTokenRequest;
use crate::error::ApiResult;

impl ApiClient {
    /// `POST push/token/register`
    pub async fn register_push_token(&self, token: &str) -> ApiResult<()> {
        let request = PushTokenRequest {
            token: token.to_string(),
        };
        request.validate()?;

        self.call::<serde_json::Value, _>(|http| {
            http.post(self.url("push/token/register")).json(&request)
        })
        .await?;
        Ok(())
    }
}
