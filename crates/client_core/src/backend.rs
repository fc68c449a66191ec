//! HTTP implementations of the collaborator seams.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{ActionItem, FinancialRecord, Identity, TenantId},
    error::{AuthError, FetchError},
    protocol::{
        ActionItemsResponse, FinancialsResponse, LoginRequest, LoginResponse, SessionResponse,
        SummarizeRequest, SummarizeResponse,
    },
};

use crate::{AuthBackend, InsightBackend, TenantDataBackend};

pub struct HttpAuthBackend {
    http: Client,
    base_url: String,
}

impl HttpAuthBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, email: &str) -> Result<(String, Identity), AuthError> {
        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .json(&LoginRequest {
                email: email.to_string(),
            })
            .send()
            .await
            .map_err(|err| AuthError::Backend(err.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }

        let body: LoginResponse = response
            .error_for_status()
            .map_err(|err| AuthError::Backend(err.to_string()))?
            .json()
            .await
            .map_err(|err| AuthError::Backend(err.to_string()))?;

        Ok((body.token, body.identity))
    }

    async fn resolve(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        let response = self
            .http
            .get(format!("{}/session", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| AuthError::Backend(err.to_string()))?;

        // An unknown or expired token is signed-out, not an error.
        if response.status() == StatusCode::UNAUTHORIZED
            || response.status() == StatusCode::NOT_FOUND
        {
            return Ok(None);
        }

        let body: SessionResponse = response
            .error_for_status()
            .map_err(|err| AuthError::Backend(err.to_string()))?
            .json()
            .await
            .map_err(|err| AuthError::Backend(err.to_string()))?;

        Ok(body.identity)
    }
}

pub struct HttpTenantBackend {
    http: Client,
    base_url: String,
}

impl HttpTenantBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TenantDataBackend for HttpTenantBackend {
    async fn fetch_financials(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<FinancialRecord>, FetchError> {
        let body: FinancialsResponse = self
            .http
            .get(format!("{}/tenants/{tenant_id}/financials", self.base_url))
            .send()
            .await
            .map_err(|err| FetchError(err.to_string()))?
            .error_for_status()
            .map_err(|err| FetchError(err.to_string()))?
            .json()
            .await
            .map_err(|err| FetchError(err.to_string()))?;

        Ok(body.records)
    }

    async fn fetch_action_items(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<ActionItem>, FetchError> {
        let body: ActionItemsResponse = self
            .http
            .get(format!("{}/tenants/{tenant_id}/actions", self.base_url))
            .send()
            .await
            .map_err(|err| FetchError(err.to_string()))?
            .error_for_status()
            .map_err(|err| FetchError(err.to_string()))?
            .json()
            .await
            .map_err(|err| FetchError(err.to_string()))?;

        Ok(body.items)
    }
}

/// Client for the external text-generation service. The credential is
/// optional by design: without one, `is_configured` reports false and the
/// requester resolves its sentinel without ever calling `summarize`.
pub struct HttpInsightBackend {
    http: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpInsightBackend {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        }
    }
}

#[async_trait]
impl InsightBackend for HttpInsightBackend {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn summarize(&self, prompt: &str) -> anyhow::Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no API credential configured"))?;

        let body: SummarizeResponse = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .json(&SummarizeRequest {
                model: self.model.clone(),
                prompt: prompt.to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body.text)
    }
}
