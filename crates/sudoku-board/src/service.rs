//! Contracts with the remote puzzle service.
//!
//! The board never performs I/O itself. The controller describes what it
//! needs as a [`ServiceRequest`]; whoever drives the controller executes it
//! against a [`PuzzleService`] (on whatever thread suits them) and feeds the
//! resulting [`ServiceReply`] back.

use crate::error::{ServiceAction, ServiceError, ServiceResult};
use crate::types::{Difficulty, FillSourceMap, Grid};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// One placement (or removal, for value 0) made by the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStep {
    pub row: usize,
    pub col: usize,
    pub value: u8,
}

/// Body of solve and validate requests
#[derive(Debug, Clone, Serialize)]
pub struct BoardPayload {
    pub board: Grid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub puzzle: Grid,
    #[serde(default)]
    pub solution: Option<Grid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResponse {
    pub board: Grid,
    /// Present when a step trace was requested; selects the replay animation
    #[serde(default)]
    pub steps: Option<Vec<SolveStep>>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizeResponse {
    pub board: Grid,
    /// Per-cell recognition tags; selects the reveal animation
    #[serde(default)]
    pub source_map: Option<FillSourceMap>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The four remote operations the board consumes
pub trait PuzzleService: Send + Sync {
    fn generate(&self, difficulty: Difficulty) -> ServiceResult<GenerateResponse>;

    fn solve(&self, board: &Grid, with_steps: bool) -> ServiceResult<SolveResponse>;

    /// Whether the board is a fully correct solution, not merely conflict-free
    fn validate(&self, board: &Grid) -> ServiceResult<ValidateResponse>;

    fn recognize(&self, image: &Path) -> ServiceResult<RecognizeResponse>;

    /// Backend name for display
    fn backend_name(&self) -> &'static str;
}

/// A call the controller wants made
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceRequest {
    Generate { difficulty: Difficulty },
    Solve { board: Grid, with_steps: bool },
    Validate { board: Grid },
    Recognize { image: PathBuf },
}

/// The outcome of a [`ServiceRequest`]
#[derive(Debug)]
pub enum ServiceReply {
    Generated(ServiceResult<GenerateResponse>),
    Solved(ServiceResult<SolveResponse>),
    Validated(ServiceResult<ValidateResponse>),
    Recognized(ServiceResult<RecognizeResponse>),
}

impl ServiceRequest {
    pub fn action(&self) -> ServiceAction {
        match self {
            ServiceRequest::Generate { .. } => ServiceAction::Generate,
            ServiceRequest::Solve { .. } => ServiceAction::Solve,
            ServiceRequest::Validate { .. } => ServiceAction::Validate,
            ServiceRequest::Recognize { .. } => ServiceAction::Recognize,
        }
    }

    /// Perform the call. Blocks for as long as the service takes.
    pub fn execute(&self, service: &dyn PuzzleService) -> ServiceReply {
        match self {
            ServiceRequest::Generate { difficulty } => {
                ServiceReply::Generated(service.generate(*difficulty))
            }
            ServiceRequest::Solve { board, with_steps } => {
                ServiceReply::Solved(service.solve(board, *with_steps))
            }
            ServiceRequest::Validate { board } => ServiceReply::Validated(service.validate(board)),
            ServiceRequest::Recognize { image } => ServiceReply::Recognized(service.recognize(image)),
        }
    }
}

impl ServiceReply {
    pub fn action(&self) -> ServiceAction {
        match self {
            ServiceReply::Generated(_) => ServiceAction::Generate,
            ServiceReply::Solved(_) => ServiceAction::Solve,
            ServiceReply::Validated(_) => ServiceAction::Validate,
            ServiceReply::Recognized(_) => ServiceAction::Recognize,
        }
    }
}

// ==================== Mock Backend ====================

#[derive(Debug, Clone, Default)]
struct MockResponses {
    puzzle: Option<Grid>,
    solution: Option<SolveResponse>,
    is_valid: bool,
    recognition: Option<RecognizeResponse>,
}

/// In-memory service for tests and offline demos.
///
/// Any operation without a canned response fails with a 400 status, and
/// every operation fails with a transport error while unavailable.
#[derive(Debug)]
pub struct MockPuzzleService {
    responses: Mutex<MockResponses>,
    available: Mutex<bool>,
    calls: Mutex<Vec<ServiceAction>>,
}

impl MockPuzzleService {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(MockResponses::default()),
            available: Mutex::new(true),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_puzzle(self, puzzle: Grid) -> Self {
        self.lock_responses().puzzle = Some(puzzle);
        self
    }

    pub fn with_solution(self, solution: SolveResponse) -> Self {
        self.lock_responses().solution = Some(solution);
        self
    }

    pub fn with_validity(self, is_valid: bool) -> Self {
        self.lock_responses().is_valid = is_valid;
        self
    }

    pub fn with_recognition(self, recognition: RecognizeResponse) -> Self {
        self.lock_responses().recognition = Some(recognition);
        self
    }

    /// Set whether calls should succeed at the transport level
    pub fn set_available(&self, available: bool) {
        *self.available.lock().unwrap_or_else(PoisonError::into_inner) = available;
    }

    /// Actions called so far, in order
    pub fn calls(&self) -> Vec<ServiceAction> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, MockResponses> {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, action: ServiceAction) -> ServiceResult<MockResponses> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(action);
        if !*self.available.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(ServiceError::transport("Mock unavailable"));
        }
        Ok(self.lock_responses().clone())
    }
}

impl Default for MockPuzzleService {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleService for MockPuzzleService {
    fn generate(&self, _difficulty: Difficulty) -> ServiceResult<GenerateResponse> {
        let responses = self.record(ServiceAction::Generate)?;
        let puzzle = responses
            .puzzle
            .ok_or_else(|| ServiceError::status(ServiceAction::Generate, 400))?;
        Ok(GenerateResponse {
            puzzle,
            solution: None,
        })
    }

    fn solve(&self, _board: &Grid, with_steps: bool) -> ServiceResult<SolveResponse> {
        let responses = self.record(ServiceAction::Solve)?;
        let mut solution = responses
            .solution
            .ok_or_else(|| ServiceError::status(ServiceAction::Solve, 400))?;
        if !with_steps {
            solution.steps = None;
        }
        Ok(solution)
    }

    fn validate(&self, _board: &Grid) -> ServiceResult<ValidateResponse> {
        let responses = self.record(ServiceAction::Validate)?;
        Ok(ValidateResponse {
            is_valid: responses.is_valid,
        })
    }

    fn recognize(&self, _image: &Path) -> ServiceResult<RecognizeResponse> {
        let responses = self.record(ServiceAction::Recognize)?;
        responses
            .recognition
            .ok_or_else(|| ServiceError::status(ServiceAction::Recognize, 422))
    }

    fn backend_name(&self) -> &'static str {
        "Mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FillSource, Position};

    #[test]
    fn test_solve_response_without_steps() {
        let json = format!(r#"{{"board": {}, "message": "Puzzle solved successfully"}}"#, grid_json());
        let response: SolveResponse = serde_json::from_str(&json).unwrap();
        assert!(response.steps.is_none());
        assert_eq!(response.message.as_deref(), Some("Puzzle solved successfully"));
    }

    #[test]
    fn test_solve_response_with_steps() {
        let json = format!(
            r#"{{"board": {}, "steps": [{{"row": 0, "col": 2, "value": 4}}], "message": null}}"#,
            grid_json()
        );
        let response: SolveResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(
            response.steps,
            Some(vec![SolveStep { row: 0, col: 2, value: 4 }])
        );
    }

    #[test]
    fn test_recognize_response_source_map() {
        let row = r#"["ocr","empty","empty","empty","empty","empty","empty","empty","user"]"#;
        let rows = vec![row; 9].join(",");
        let json = format!(r#"{{"board": {}, "source_map": [{}]}}"#, grid_json(), rows);
        let response: RecognizeResponse = serde_json::from_str(&json).unwrap();
        let map = response.source_map.unwrap();
        assert_eq!(map.get(Position::new(3, 0)), FillSource::Ocr);
        assert_eq!(map.get(Position::new(3, 8)), FillSource::User);
    }

    #[test]
    fn test_generate_response_ignores_missing_solution() {
        let json = format!(r#"{{"puzzle": {}}}"#, grid_json());
        let response: GenerateResponse = serde_json::from_str(&json).unwrap();
        assert!(response.solution.is_none());
    }

    #[test]
    fn test_generate_response_rejects_out_of_range_digit() {
        let json = grid_json().replacen('0', "42", 1);
        let result = serde_json::from_str::<GenerateResponse>(&format!(r#"{{"puzzle": {json}}}"#));
        assert!(result.is_err());

        let json = grid_json().replacen('0', "250", 1);
        let result = serde_json::from_str::<RecognizeResponse>(&format!(r#"{{"board": {json}}}"#));
        assert!(result.is_err());
    }

    #[test]
    fn test_board_payload_shape() {
        let payload = BoardPayload { board: Grid::empty() };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["board"][8][8], 0);
    }

    #[test]
    fn test_mock_unavailable() {
        let service = MockPuzzleService::new().with_puzzle(Grid::empty());
        service.set_available(false);
        let reply = ServiceRequest::Generate {
            difficulty: Difficulty::Easy,
        }
        .execute(&service);
        assert!(matches!(reply, ServiceReply::Generated(Err(ServiceError::Transport(_)))));
        assert_eq!(service.calls(), vec![ServiceAction::Generate]);
    }

    #[test]
    fn test_mock_strips_steps_when_not_requested() {
        let service = MockPuzzleService::new().with_solution(SolveResponse {
            board: Grid::filled(1),
            steps: Some(vec![SolveStep { row: 0, col: 0, value: 1 }]),
            message: None,
        });
        let response = service.solve(&Grid::empty(), false).unwrap();
        assert!(response.steps.is_none());
    }

    fn grid_json() -> String {
        serde_json::to_string(&Grid::empty()).unwrap()
    }
}
