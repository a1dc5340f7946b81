// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client for the third-party banana puzzle API.
//!
//! The upstream returns `{"question": "<image url>", "solution": <int>, ...}`;
//! only those two fields are kept.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::models::GameQuestion;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("puzzle request failed: {0}")]
    Request(String),

    #[error("puzzle response was invalid: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct UpstreamPuzzle {
    question: String,
    solution: i64,
}

#[derive(Debug, Clone)]
pub struct PuzzleClient {
    url: Url,
    http: Client,
}

impl PuzzleClient {
    pub fn new(url: Url) -> Result<Self, PuzzleError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PuzzleError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { url, http })
    }

    /// Fetch one puzzle.
    pub async fn fetch(&self) -> Result<GameQuestion, PuzzleError> {
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| PuzzleError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PuzzleError::Request(format!(
                "HTTP {} from puzzle endpoint",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PuzzleError::Request(e.to_string()))?;
        let question = parse_question(&body)?;
        debug!(solution = question.solution, "puzzle fetched");
        Ok(question)
    }
}

/// Extract question and solution from an upstream body.
pub fn parse_question(body: &[u8]) -> Result<GameQuestion, PuzzleError> {
    let upstream: UpstreamPuzzle =
        serde_json::from_slice(body).map_err(|e| PuzzleError::InvalidResponse(e.to_string()))?;
    Ok(GameQuestion {
        question: upstream.question,
        solution: upstream.solution,
    })
}
