//! `webauthn/assertion/*` endpoints

use crate::client::ApiClient;
use crate::dto::{AssertionOptions, AssertionResultRequest};
use crate::error::ApiResult;

impl ApiClient {
    /// `GET webauthn/assertion/options`, answered without the envelope
    pub async fn assertion_options(&self) -> ApiResult<AssertionOptions> {
        self.call_plain(|http| http.get(self.url("webauthn/assertion/options")))
            .await
    }

    /// `POST webauthn/assertion/result`
    pub async fn verify_assertion(&self, request_id: &str, credential_json: &str) -> ApiResult<()> {
        let request = AssertionResultRequest {
            request_id: request_id.to_string(),
            credential: credential_json.to_string(),
        };
        self.call::<serde_json::Value, _>(|http| {
            http.post(self.url("webauthn/assertion/result")).json(&request)
        })
        .await?;
        Ok(())
    }
}
