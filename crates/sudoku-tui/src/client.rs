//! HTTP implementation of the puzzle service.
//!
//! Talks to the puzzle API:
//! - `GET  /generate?difficulty=easy|medium|hard`
//! - `POST /solve?show_steps=true|false` with `{"board": [[..]]}`
//! - `POST /validate` with `{"board": [[..]]}`
//! - `POST /process-image` multipart, field `image`

use reqwest::blocking::{multipart, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use sudoku_board::{
    BoardPayload, Difficulty, GenerateResponse, Grid, PuzzleService, RecognizeResponse,
    ServiceAction, ServiceError, ServiceResult, SolveResponse, ValidateResponse,
};
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Error body returned by the API on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Puzzle service over HTTP
pub struct HttpPuzzleService {
    base_url: String,
    client: Client,
}

impl HttpPuzzleService {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        // Solving and recognition can take a while; never give up on a call
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send a request and decode the JSON body of a success response
    fn send<T: DeserializeOwned>(&self, action: ServiceAction, request: RequestBuilder) -> ServiceResult<T> {
        let response = request.send().map_err(transport)?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => warn!(%action, status = status.as_u16(), detail = %body.detail, "service rejected request"),
                Err(_) => warn!(%action, status = status.as_u16(), "service rejected request"),
            }
            return Err(ServiceError::status(action, status.as_u16()));
        }

        let text = response.text().map_err(transport)?;
        debug!(%action, bytes = text.len(), "service responded");
        serde_json::from_str(&text).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

fn transport(error: reqwest::Error) -> ServiceError {
    ServiceError::transport(error.to_string())
}

impl PuzzleService for HttpPuzzleService {
    fn generate(&self, difficulty: Difficulty) -> ServiceResult<GenerateResponse> {
        let request = self
            .client
            .get(self.url("/generate"))
            .query(&[("difficulty", difficulty.as_str())]);
        self.send(ServiceAction::Generate, request)
    }

    fn solve(&self, board: &Grid, with_steps: bool) -> ServiceResult<SolveResponse> {
        let show_steps = if with_steps { "true" } else { "false" };
        let request = self
            .client
            .post(self.url("/solve"))
            .query(&[("show_steps", show_steps)])
            .json(&BoardPayload { board: *board });
        self.send(ServiceAction::Solve, request)
    }

    fn validate(&self, board: &Grid) -> ServiceResult<ValidateResponse> {
        let request = self
            .client
            .post(self.url("/validate"))
            .json(&BoardPayload { board: *board });
        self.send(ServiceAction::Validate, request)
    }

    fn recognize(&self, image: &Path) -> ServiceResult<RecognizeResponse> {
        let form = multipart::Form::new().file("image", image)?;
        let request = self.client.post(self.url("/process-image")).multipart(form);
        self.send(ServiceAction::Recognize, request)
    }

    fn backend_name(&self) -> &'static str {
        "HTTP"
    }
}
