//! Interactive Sudoku board engine.
//!
//! Owns a 9x9 board with a fixed-clue mask and three per-cell overlays
//! (fill source, provenance, conflicts), keyboard/pointer editing with
//! live conflict detection, and timed playback of recognition results
//! and solver traces. Remote work (generation, solving, validation,
//! image recognition) is described by [`ServiceRequest`] and executed by
//! the caller against a [`PuzzleService`].
//!
//! ```
//! use std::time::Instant;
//! use sudoku_board::{InputEvent, InteractionController, Position};
//!
//! let mut board = InteractionController::default();
//! board.handle_input(InputEvent::Select(Position::new(4, 4)));
//! board.handle_input(InputEvent::Digit(7));
//! board.advance(Instant::now());
//! assert_eq!(board.state().value(Position::new(4, 4)), 7);
//! ```

pub mod animation;
pub mod constraint;
pub mod controller;
pub mod error;
pub mod grid;
pub mod navigation;
pub mod service;
pub mod timer;
pub mod types;

pub use animation::{AnimationSequencer, SequenceId, SequenceKind, SequenceStart, Tick, TickOutcome};
pub use constraint::compute_errors;
pub use controller::{
    ControllerConfig, InputEvent, InteractionController, LoadingFlags, Message, MessageTone,
};
pub use error::{BoardError, ServiceAction, ServiceError, ServiceResult};
pub use grid::GridState;
pub use navigation::move_selection;
pub use service::{
    BoardPayload, GenerateResponse, MockPuzzleService, PuzzleService, RecognizeResponse,
    ServiceReply, ServiceRequest, SolveResponse, SolveStep, ValidateResponse,
};
pub use timer::{format_time, SessionTimer, TickQueue};
pub use types::{
    CellMap, Difficulty, Direction, ErrorMap, FillSource, FillSourceMap, Grid, Position,
    Provenance, ProvenanceMap, SIZE,
};
