use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;

/// Request body sent to the remote move-selection service: the full
/// board as integers, 0 = empty, 1 = remote player, 2 = human player,
/// row-major with the top row first.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MoveRequest {
    pub board: Vec<Vec<u8>>,
}

/// Response body from the remote move-selection service. A null or
/// absent column means the service offered no legal move.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MoveResponse {
    #[serde(default)]
    pub column: Option<usize>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("move provider unavailable: {0}")]
    Unavailable(String),

    #[error("invalid response from move provider: {0}")]
    InvalidResponse(String),
}

/// HTTP client for the remote move-selection service.
///
/// The provider is consulted once per remote turn and trusted only so
/// far: the column it returns is range-checked here and re-validated
/// against the board by the caller before any state changes.
pub struct MoveProvider {
    endpoint: String,
    timeout: Duration,
}

impl MoveProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        MoveProvider {
            endpoint: config.endpoint.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// Ask the service to pick a column for the given board.
    pub async fn choose_column(&self, board: Vec<Vec<u8>>) -> Result<usize, ProviderError> {
        let cols = board.first().map_or(0, Vec::len);

        let client = awc::Client::default();
        let mut response = client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .send_json(&MoveRequest { board })
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Unavailable(format!(
                "service returned {}",
                response.status()
            )));
        }

        let body: MoveResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        info!("Move provider chose column {:?}", body.column);
        validate_column(body.column, cols)
    }
}

fn validate_column(column: Option<usize>, cols: usize) -> Result<usize, ProviderError> {
    match column {
        None => Err(ProviderError::InvalidResponse(
            "no column offered".to_string(),
        )),
        Some(column) if column >= cols => Err(ProviderError::InvalidResponse(format!(
            "column {column} is out of range"
        ))),
        Some(column) => Ok(column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chosen_column_passes_validation() {
        assert_eq!(validate_column(Some(3), 7).unwrap(), 3);
    }

    #[test]
    fn missing_column_is_an_invalid_response() {
        assert!(matches!(
            validate_column(None, 7),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn out_of_range_column_is_an_invalid_response() {
        assert!(matches!(
            validate_column(Some(7), 7),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn response_parses_with_column() {
        let response: MoveResponse = serde_json::from_str(r#"{"column": 4}"#).unwrap();
        assert_eq!(response.column, Some(4));
    }

    #[test]
    fn response_parses_null_and_absent_columns() {
        let null: MoveResponse = serde_json::from_str(r#"{"column": null}"#).unwrap();
        assert_eq!(null.column, None);

        let absent: MoveResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.column, None);
    }

    #[test]
    fn malformed_column_fails_to_parse() {
        assert!(serde_json::from_str::<MoveResponse>(r#"{"column": "left"}"#).is_err());
        assert!(serde_json::from_str::<MoveResponse>(r#"{"column": -2}"#).is_err());
    }

    #[test]
    fn request_serializes_the_board_grid() {
        let request = MoveRequest {
            board: vec![vec![0, 0], vec![1, 2]],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "board": [[0, 0], [1, 2]] }));
    }

    #[actix_rt::test]
    async fn unreachable_service_is_unavailable() {
        let provider = MoveProvider::new(&ProviderConfig {
            // Nothing listens on the discard port.
            endpoint: "http://127.0.0.1:9/get-move".to_string(),
            timeout_ms: 500,
        });

        let result = provider.choose_column(vec![vec![0; 7]; 6]).await;
        assert!(matches!(result, Err(ProviderError::Unavailable(_))));
    }
}
