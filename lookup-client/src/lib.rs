//! HTTP transport for text field lookups: POSTs the lookup request as JSON
//! and decodes the service's reply.

use std::time::Duration;

use async_trait::async_trait;
use oxi_text_field::LookupError;
use oxi_text_field::LookupReply;
use oxi_text_field::LookupRequest;
use oxi_text_field::LookupTransport;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::USER_AGENT;
use serde_json::Value as JsonValue;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_USER_AGENT: &str = "oxi-text-field";

#[derive(Clone, Debug)]
pub struct HttpLookupTransport {
    endpoint: String,
    http: reqwest::Client,
    bearer_token: Option<String>,
    user_agent: Option<HeaderValue>,
}

impl HttpLookupTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| LookupError::Request(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
            bearer_token: None,
            user_agent: None,
        })
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        if let Ok(hv) = HeaderValue::from_str(&ua.into()) {
            self.user_agent = Some(hv);
        }
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn headers(&self) -> HeaderMap {
        let mut h = HeaderMap::new();
        match &self.user_agent {
            Some(ua) => h.insert(USER_AGENT, ua.clone()),
            None => h.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT)),
        };
        if let Some(token) = &self.bearer_token
            && let Ok(hv) = HeaderValue::from_str(&format!("Bearer {token}"))
        {
            h.insert(AUTHORIZATION, hv);
        }
        h
    }

    pub async fn lookup(&self, request: &LookupRequest) -> Result<LookupReply, LookupError> {
        tracing::debug!(endpoint = %self.endpoint, action = %request.action, "POST lookup");
        let res = self
            .http
            .post(&self.endpoint)
            .headers(self.headers())
            .json(request)
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        let status = res.status();
        let ct = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let body = res
            .text()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: JsonValue = serde_json::from_str(&body).map_err(|e| {
            LookupError::Decode(format!("{e}; content-type={ct}; body={body}"))
        })?;
        LookupReply::from_json(value)
    }
}

#[async_trait]
impl LookupTransport for HttpLookupTransport {
    async fn send_query(&self, request: LookupRequest) -> Result<LookupReply, LookupError> {
        self.lookup(&request).await
    }
}
