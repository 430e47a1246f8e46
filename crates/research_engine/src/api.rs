use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    ApiError, CreateJobRequest, CreateJobResponse, FailureKind, HistoryResponse, ReportResponse,
    StatusResponse,
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl ApiSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }

    pub fn parse(base_url: &str) -> Result<Self, ApiError> {
        let url = Url::parse(base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        Ok(Self::new(url))
    }
}

/// The four backend calls the client depends on.
#[async_trait::async_trait]
pub trait ResearchApi: Send + Sync {
    async fn create_job(&self, request: &CreateJobRequest) -> Result<CreateJobResponse, ApiError>;

    async fn job_status(&self, research_id: &str) -> Result<StatusResponse, ApiError>;

    async fn job_report(&self, research_id: &str) -> Result<ReportResponse, ApiError>;

    async fn history(&self) -> Result<HistoryResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestResearchApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestResearchApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::new(FailureKind::InvalidUrl, "base url cannot hold a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.decode(response).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        let body = self.read_body(response).await?;
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ResearchApi for ReqwestResearchApi {
    async fn create_job(&self, request: &CreateJobRequest) -> Result<CreateJobResponse, ApiError> {
        let url = self.endpoint(&["api", "research"])?;
        let body = serde_json::to_vec(request)
            .map_err(|err| ApiError::new(FailureKind::Encode, err.to_string()))?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.decode(response).await
    }

    async fn job_status(&self, research_id: &str) -> Result<StatusResponse, ApiError> {
        let url = self.endpoint(&["api", "research", research_id])?;
        self.get_json(url).await
    }

    async fn job_report(&self, research_id: &str) -> Result<ReportResponse, ApiError> {
        let url = self.endpoint(&["api", "research", research_id, "report"])?;
        self.get_json(url).await
    }

    async fn history(&self) -> Result<HistoryResponse, ApiError> {
        let url = self.endpoint(&["api", "history"])?;
        self.get_json(url).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> ReqwestResearchApi {
        ReqwestResearchApi::new(ApiSettings::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn endpoint_appends_to_base_path() {
        let api = api("http://localhost:5000/prefix/");
        let url = api.endpoint(&["api", "research", "r1", "report"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/prefix/api/research/r1/report");
    }

    #[test]
    fn endpoint_escapes_job_id() {
        let api = api("http://localhost:5000");
        let url = api.endpoint(&["api", "research", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/research/a%2Fb%20c");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ApiSettings::parse("not a url").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
