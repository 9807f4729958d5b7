use std::time::Duration;

use anyhow::Result;
use log::{debug, info};
use reqwest::{Client, header::ACCEPT};
use serde::Deserialize;

use crate::constants::{TOKEN_URL, USER_AGENT};
use crate::error::FetchError;
use crate::models::Credentials;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
pub trait TokenProvider : Send + Sync + 'static {
    async fn get_token(&self) -> Result<String, FetchError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<u64>,
}

/// Client-credentials exchange against the service's OAuth endpoint.
pub struct DefaultTokenProvider {
    client: Client,
    token_url: String,
    credentials: Credentials,
}

impl TokenProvider for DefaultTokenProvider {
    async fn get_token(&self) -> Result<String, FetchError> {
        if !self.credentials.is_complete() {
            return Err(FetchError::Auth("client id and secret are required".into()));
        }

        let response = self.client
            .post(&self.token_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .header(ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();

        // the token endpoint answers bad credentials with 400 as well as 401
        if status.is_client_error() && status != reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::Auth(format!("token request returned {status}")));
        }

        if !status.is_success() {
            return Err(FetchError::from_status(status, "token request"));
        }

        let body: TokenResponse = response.json().await?;
        let token = parse_token(body)?;
        info!("obtained access token");

        Ok(token)
    }
}

impl DefaultTokenProvider {
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            token_url: TOKEN_URL.to_string(),
            credentials,
        })
    }
}

fn parse_token(body: TokenResponse) -> Result<String, FetchError> {
    if let Some(token_type) = &body.token_type {
        if !token_type.eq_ignore_ascii_case("bearer") {
            return Err(FetchError::MalformedResponse(format!("unexpected token type {token_type}")));
        }
    }

    if let Some(expires_in) = body.expires_in {
        debug!("access token expires in {expires_in}s");
    }

    body.access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| FetchError::MalformedResponse("token response has no access_token".into()))
}
