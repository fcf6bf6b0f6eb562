//! 외부 서비스(계산 API, 시세 API, 어드바이저) 블로킹 HTTP 클라이언트.
//!
//! 전송 오류와 5xx 응답만 지수 백오프로 재시도한다. 4xx와 디코딩 오류는 즉시 실패.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::advisor::Advisor;
use crate::cable::{CableSizer, SizingError, SizingInput, SizingResult};
use crate::config::ApiConfig;
use crate::market::{MarketSnapshot, PriceRange};

/// 백오프 대기 시간 상한.
const MAX_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 연결 실패, 타임아웃 등
    #[error("서버에 연결할 수 없습니다: {0}")]
    Transport(String),
    #[error("서버 응답 코드 {0}")]
    Status(u16),
    #[error("응답 해석 오류: {0}")]
    Decode(String),
    #[error(transparent)]
    InvalidInput(#[from] SizingError),
}

impl ApiError {
    /// 재시도할 가치가 있는 오류인지.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status(code) => *code >= 500,
            ApiError::Decode(_) | ApiError::InvalidInput(_) => false,
        }
    }
}

impl From<ureq::Error> for ApiError {
    fn from(value: ureq::Error) -> Self {
        match value {
            ureq::Error::Status(code, _) => ApiError::Status(code),
            ureq::Error::Transport(t) => ApiError::Transport(t.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    prompt: &'a str,
    lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    text: String,
}

/// `attempt`번째 재시도 전 대기 시간 (0부터, 매번 두 배).
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_BACKOFF)
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
    retries: u32,
    backoff: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, retries: u32, backoff: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
            retries,
            backoff,
        }
    }

    pub fn from_config(cfg: &ApiConfig) -> Self {
        Self::new(
            &cfg.base_url,
            Duration::from_secs(cfg.timeout_secs),
            cfg.retries,
            Duration::from_millis(cfg.backoff_ms),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn with_retry<T>(
        &self,
        what: &str,
        mut call: impl FnMut() -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut attempt = 0;
        loop {
            match call() {
                Ok(v) => return Ok(v),
                Err(err) if err.is_retryable() && attempt < self.retries => {
                    let wait = backoff_delay(self.backoff, attempt);
                    warn!(what, attempt, error = %err, ?wait, "request failed, retrying");
                    thread::sleep(wait);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// `GET /api/market/price?range=`
    pub fn fetch_market(&self, range: PriceRange) -> Result<MarketSnapshot, ApiError> {
        let url = self.endpoint("/api/market/price");
        debug!(%url, %range, "fetching market snapshot");
        let response = self.with_retry("market", || {
            Ok(self
                .agent
                .get(&url)
                .query("range", range.as_query())
                .call()?)
        })?;
        response
            .into_json::<MarketSnapshot>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `POST /api/calculate`. 입력은 보내기 전에 로컬에서 먼저 검증한다.
    pub fn calculate(&self, input: &SizingInput) -> Result<SizingResult, ApiError> {
        input.validate()?;
        let url = self.endpoint("/api/calculate");
        debug!(%url, "remote sizing request");
        let response = self.with_retry("calculate", || Ok(self.agent.post(&url).send_json(input)?))?;
        response
            .into_json::<SizingResult>()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `POST /api/chat`
    pub fn chat(&self, prompt: &str, lang: &str) -> Result<String, ApiError> {
        let url = self.endpoint("/api/chat");
        let body = ChatRequest { prompt, lang };
        let response = self.with_retry("chat", || Ok(self.agent.post(&url).send_json(&body)?))?;
        let reply: ChatResponse = response
            .into_json()
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(reply.text)
    }
}

impl CableSizer for ApiClient {
    type Error = ApiError;

    fn size(&self, input: &SizingInput) -> Result<SizingResult, ApiError> {
        self.calculate(input)
    }
}

impl Advisor for ApiClient {
    fn ask(&self, prompt: &str, lang: &str) -> Result<String, ApiError> {
        self.chat(prompt, lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(retries: u32) -> ApiClient {
        ApiClient::new(
            "http://127.0.0.1:1/",
            Duration::from_millis(200),
            retries,
            Duration::from_millis(1),
        )
    }

    #[test]
    fn endpoint_joins_single_slash() {
        let c = client(0);
        assert_eq!(c.base_url(), "http://127.0.0.1:1");
        assert_eq!(c.endpoint("/api/chat"), "http://127.0.0.1:1/api/chat");
        assert_eq!(c.endpoint("api/calculate"), "http://127.0.0.1:1/api/calculate");
    }

    #[test]
    fn only_transport_and_server_errors_retry() {
        assert!(ApiError::Transport("reset".into()).is_retryable());
        assert!(ApiError::Status(503).is_retryable());
        assert!(!ApiError::Status(404).is_retryable());
        assert!(!ApiError::Decode("eof".into()).is_retryable());
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(400));
        assert_eq!(backoff_delay(base, 30), MAX_BACKOFF);
    }

    #[test]
    fn retry_stops_after_budget() {
        let c = client(2);
        let mut calls = 0;
        let res: Result<(), ApiError> = c.with_retry("test", || {
            calls += 1;
            Err(ApiError::Status(502))
        });
        assert!(matches!(res, Err(ApiError::Status(502))));
        assert_eq!(calls, 3);
    }

    #[test]
    fn client_errors_fail_fast() {
        let c = client(5);
        let mut calls = 0;
        let res: Result<(), ApiError> = c.with_retry("test", || {
            calls += 1;
            Err(ApiError::Status(400))
        });
        assert!(res.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn invalid_input_is_rejected_before_network() {
        let c = client(0);
        let input = SizingInput {
            ambient_temp_c: 70.0,
            ..SizingInput::default()
        };
        assert!(matches!(c.calculate(&input), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn unreachable_server_is_transport_error() {
        let c = client(1);
        assert!(matches!(
            c.fetch_market(PriceRange::Day),
            Err(ApiError::Transport(_))
        ));
    }
}
