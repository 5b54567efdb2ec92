use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::MoveOracle;
use crate::error::OracleError;

/// Where the hosted model API lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct HttpOracleConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveRequestBody<'a> {
    model_type: &'a str,
    board: &'a [Vec<u8>],
}

#[derive(Deserialize)]
struct MoveResponseBody {
    #[serde(default)]
    best_move: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Move oracle backed by the model API: `POST {base}/move`, `GET {base}/health`.
pub struct HttpOracle {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOracle {
    pub fn new(config: HttpOracleConfig) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(HttpOracle {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Pull the column out of a `/move` response body.
fn parse_move_response(text: &str) -> Result<usize, OracleError> {
    let body: MoveResponseBody = serde_json::from_str(text)?;

    if let Some(error) = body.error.filter(|e| !e.is_empty()) {
        return Err(OracleError::Rejected(error));
    }

    let number = match body.best_move {
        Some(serde_json::Value::Number(number)) => number,
        _ => return Err(OracleError::MissingMove),
    };
    if let Some(col) = number.as_u64() {
        return Ok(col as usize);
    }
    // Whole floats such as 3.0 still name a column.
    match number.as_f64() {
        Some(col) if col >= 0.0 && col.fract() == 0.0 && col <= usize::MAX as f64 => {
            Ok(col as usize)
        }
        _ => Err(OracleError::InvalidMove(number.to_string())),
    }
}

#[async_trait]
impl MoveOracle for HttpOracle {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn best_move(&self, board: &[Vec<u8>], variant: &str) -> Result<usize, OracleError> {
        let url = format!("{}/move", self.base_url);
        let body = MoveRequestBody {
            model_type: variant,
            board,
        };
        trace!(%url, variant, ?board, "requesting oracle move");

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        trace!(status = status.as_u16(), response = %text, "oracle replied");

        if !status.is_success() {
            return Err(OracleError::Status(status.as_u16()));
        }
        parse_move_response(&text)
    }

    async fn health(&self) -> Result<(), OracleError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Status(status.as_u16()));
        }
        let text = response.text().await?;
        serde_json::from_str::<serde_json::Value>(&text)?;
        Ok(())
    }
}
