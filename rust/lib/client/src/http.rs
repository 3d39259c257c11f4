use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::ReissueApi;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::model::{
    AcceptedPayload, EligibilityResponse, HistoryRequest, ReissueForm, StatusResponse,
    SubmitResponse, TransferResponse,
};

/// reqwest-backed [`ReissueApi`].
pub struct HttpClient {
    http: reqwest::Client,
    base: Url,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base = Url::parse(config.base_url.trim()).map_err(|e| ApiError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: config.base_url.clone(),
                reason: "not a hierarchical URL".into(),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: self.base.to_string(),
                reason: "not a hierarchical URL".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Decode a 2xx body; anything else becomes `ApiError::Server`.
    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_body(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(format!("response body: {e}")))
    }

    /// Decode the body whatever the status. Only an undecodable body on a
    /// non-2xx reply becomes `ApiError::Server`.
    async fn parse_lenient<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
        let status = resp.status();
        let body = resp.text().await?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(ApiError::from_body(status.as_u16(), &body)),
            Err(e) => Err(ApiError::Decode(format!("response body: {e}"))),
        }
    }
}

#[async_trait::async_trait]
impl ReissueApi for HttpClient {
    async fn status(&self, register_number: &str) -> Result<StatusResponse, ApiError> {
        let url = self.endpoint(&["api", "status", register_number])?;
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        Self::parse(resp).await
    }

    async fn accepted_requests(
        &self,
        register_number: &str,
    ) -> Result<Vec<HistoryRequest>, ApiError> {
        let url = self.endpoint(&["api", "acceptedidcards", "user", register_number])?;
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        let payload: AcceptedPayload = Self::parse_lenient(resp).await?;
        Ok(payload.into_requests())
    }

    async fn transfer_to_history(
        &self,
        register_number: &str,
    ) -> Result<TransferResponse, ApiError> {
        let url = self.endpoint(&[
            "api",
            "acceptedidcards",
            "transfer-to-history",
            register_number,
        ])?;
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Self::parse_lenient(resp).await
    }

    async fn submit_request(&self, form: &ReissueForm) -> Result<SubmitResponse, ApiError> {
        let url = self.endpoint(&["api", "idcards"])?;
        debug!("POST {} for {}", url, form.register_number);
        let multipart = form
            .fields()
            .into_iter()
            .fold(reqwest::multipart::Form::new(), |acc, (name, value)| {
                acc.text(name, value.to_string())
            });
        let resp = self.http.post(url).multipart(multipart).send().await?;
        Self::parse(resp).await
    }

    async fn check_eligibility(
        &self,
        register_number: &str,
    ) -> Result<EligibilityResponse, ApiError> {
        let url = self.endpoint(&["api", "check-eligibility", register_number])?;
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        Self::parse_lenient(resp).await
    }

    async fn health(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["health"])?;
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::from_body(status.as_u16(), &body));
        }
        Ok(())
    }
}
