//! `member/*` endpoints for the current user

use adigo_core::User;
use reqwest::multipart::{Form, Part};
use validator::Validate;

use crate::client::ApiClient;
use crate::dto::{NicknameUpdateRequest, UserDto};
use crate::error::{ApiError, ApiResult};

impl ApiClient {
    /// `GET member/me`
    pub async fn me(&self) -> ApiResult<User> {
        let dto: UserDto = self
            .call(|http| http.get(self.url("member/me")))
            .await?
            .into_data()?;
        Ok(dto.into())
    }

    /// `PUT member/nickname`
    pub async fn update_nickname(&self, nickname: &str) -> ApiResult<User> {
        let request = NicknameUpdateRequest {
            nickname: nickname.to_string(),
        };
        request.validate()?;

        let dto: UserDto = self
            .call(|http| http.put(self.url("member/nickname")).json(&request))
            .await?
            .into_data()?;
        Ok(dto.into())
    }

    /// `POST member/profile-image` as multipart form field `file`
    pub async fn upload_profile_image(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<User> {
        // Checked once so the per-attempt rebuild below cannot fail
        Part::bytes(Vec::new())
            .mime_str(mime)
            .map_err(|e| ApiError::Config(e.to_string()))?;

        let dto: UserDto = self
            .call(|http| {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.to_string())
                    .mime_str(mime)
                    .unwrap_or_else(|_| Part::bytes(bytes.clone()).file_name(file_name.to_string()));
                http.post(self.url("member/profile-image"))
                    .multipart(Form::new().part("file", part))
            })
            .await?
            .into_data()?;
        Ok(dto.into())
    }
}
