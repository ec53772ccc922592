//! `auth/*` endpoints

use adigo_common::{TokenPair, TokenStore};
use validator::Validate;

use crate::client::ApiClient;
use crate::dto::{
    DuplicatedEmail, DuplicatedNumber, LoginRequest, SignUpRequest, SignUpResult, SmsResult,
};
use crate::error::ApiResult;

impl ApiClient {
    /// Log in and persist the issued token pair
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<TokenPair> {
        request.validate()?;

        let pair: TokenPair = self
            .call_public(|http| http.post(self.url("auth/login")).json(request))
            .await?
            .into_data()?;
        self.token_store().save(&pair)?;

        tracing::info!(email = %request.email, "Logged in");
        Ok(pair)
    }

    pub async fn signup(&self, request: &SignUpRequest) -> ApiResult<SignUpResult> {
        request.validate()?;
        self.call_public(|http| http.post(self.url("auth/signup")).json(request))
            .await?
            .into_data()
    }

    pub async fn send_sms(&self, phone: &str) -> ApiResult<SmsResult> {
        self.call_public(|http| {
            http.get(self.url("auth/check/sendSMS"))
                .query(&[("to", phone)])
        })
        .await?
        .into_data()
    }

    pub async fn verify_sms(&self, phone: &str, code: &str) -> ApiResult<SmsResult> {
        self.call_public(|http| {
            http.get(self.url("auth/check/verifySMS"))
                .query(&[("to", phone), ("code", code)])
        })
        .await?
        .into_data()
    }

    pub async fn check_duplicated_email(&self, email: &str) -> ApiResult<DuplicatedEmail> {
        self.call_public(|http| {
            http.get(self.url("auth/check/duplicatedEmail"))
                .query(&[("email", email)])
        })
        .await?
        .into_data()
    }

    pub async fn check_duplicated_number(&self, phone: &str) -> ApiResult<DuplicatedNumber> {
        self.call_public(|http| {
            http.get(self.url("auth/check/duplicatedNumber"))
                .query(&[("phonenumber", phone)])
        })
        .await?
        .into_data()
    }

    /// Force a refresh through the authenticator, outside of a 401
    ///
    /// Returns the new access token, or `None` when the session is gone.
    pub async fn reissue(&self) -> Option<String> {
        let stale = self.token_store().access_token();
        self.authenticator().authenticate(stale.as_deref(), 1).await
    }

    /// Forget the stored tokens
    pub fn logout(&self) -> ApiResult<()> {
        self.token_store().clear()?;
        tracing::info!("Logged out");
        Ok(())
    }
}
