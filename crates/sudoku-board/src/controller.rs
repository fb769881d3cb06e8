//! Top-level orchestration of the board.
//!
//! The controller owns the board state, the cursor, the animation sequencer
//! and the session timer. Player input arrives as [`InputEvent`]s; remote
//! work leaves as [`ServiceRequest`]s and comes back as [`ServiceReply`]s;
//! time only moves when the driver calls [`InteractionController::advance`].

use crate::animation::{AnimationSequencer, SequenceKind, SequenceStart, Tick, TickOutcome};
use crate::error::{ServiceAction, ServiceError};
use crate::grid::GridState;
use crate::navigation::move_selection;
use crate::service::{
    GenerateResponse, RecognizeResponse, ServiceReply, ServiceRequest, SolveResponse,
    ValidateResponse,
};
use crate::timer::{SessionTimer, TickQueue};
use crate::types::{Difficulty, Direction, FillSource, FillSourceMap, Position};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const MSG_CLEARED: &str = "Board cleared";
pub const MSG_VALID: &str = "Board is valid! 🎉";
pub const MSG_INVALID: &str = "Board is invalid. Check for errors highlighted in red.";
pub const MSG_SOLVED: &str = "Here is the solved Sudoku puzzle! 🎉";
pub const MSG_IMAGE_PROCESSED: &str =
    "Image processed! Please review the recognized digits and fill in any missing numbers manually.";

/// Pacing and feedback settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Delay between recognized digits during a reveal
    pub reveal_interval: Duration,
    /// Delay between solver steps during a replay
    pub replay_interval: Duration,
    /// How long the celebration effect lasts
    pub celebration: Duration,
    /// Delay before the "image processed" notice after a reveal starts
    pub upload_notice_delay: Duration,
    /// Ask the solver for a step trace
    pub trace_steps: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            reveal_interval: Duration::from_millis(40),
            replay_interval: Duration::from_millis(10),
            celebration: Duration::from_secs(5),
            upload_notice_delay: Duration::from_secs(1),
            trace_steps: true,
        }
    }
}

/// Player input, already decoded from whatever device produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Arrow key
    Navigate(Direction),
    /// Pointer click on a cell
    Select(Position),
    /// Digit 1-9 from keyboard or numpad
    Digit(u8),
    /// Delete/backspace or the numpad erase button
    Erase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTone {
    Info,
    Success,
    Error,
}

/// A user-visible status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub tone: MessageTone,
}

impl Message {
    pub fn new(text: impl Into<String>, tone: MessageTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// One in-flight flag per remote action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub generate: bool,
    pub solve: bool,
    pub validate: bool,
    pub upload: bool,
}

impl LoadingFlags {
    pub fn get(&self, action: ServiceAction) -> bool {
        match action {
            ServiceAction::Generate => self.generate,
            ServiceAction::Solve => self.solve,
            ServiceAction::Validate => self.validate,
            ServiceAction::Recognize => self.upload,
        }
    }

    fn set(&mut self, action: ServiceAction, loading: bool) {
        match action {
            ServiceAction::Generate => self.generate = loading,
            ServiceAction::Solve => self.solve = loading,
            ServiceAction::Validate => self.validate = loading,
            ServiceAction::Recognize => self.upload = loading,
        }
    }

    pub fn any(&self) -> bool {
        self.generate || self.solve || self.validate || self.upload
    }
}

/// The interactive board engine
#[derive(Debug)]
pub struct InteractionController {
    config: ControllerConfig,
    state: GridState,
    cursor: Option<Position>,
    sequencer: AnimationSequencer,
    ticks: TickQueue<Tick>,
    timer: SessionTimer,
    difficulty: Difficulty,
    message: Option<Message>,
    /// Message to show once its deadline passes
    pending_message: Option<(Instant, Message)>,
    loading: LoadingFlags,
    celebration_until: Option<Instant>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl InteractionController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: GridState::new(),
            cursor: None,
            sequencer: AnimationSequencer::new(),
            ticks: TickQueue::new(),
            timer: SessionTimer::new(),
            difficulty: Difficulty::default(),
            message: None,
            pending_message: None,
            loading: LoadingFlags::default(),
            celebration_until: None,
        }
    }

    // ==================== Direct input ====================

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Navigate(direction) => {
                self.cursor = Some(move_selection(self.cursor, direction, self.state.fixed_mask()));
            }
            InputEvent::Select(pos) => self.cursor = Some(pos),
            InputEvent::Digit(value) => self.edit_selected(value),
            InputEvent::Erase => self.edit_selected(0),
        }
    }

    /// Write `value` (0 erases) into the selected cell
    fn edit_selected(&mut self, value: u8) {
        let Some(pos) = self.cursor else {
            // First key press with nothing selected only places the cursor
            self.cursor = Some(Position::new(0, 0));
            return;
        };
        if value > 9 {
            warn!(value, "ignoring out-of-range digit");
            return;
        }
        if self.state.is_fixed(pos) {
            debug!(?pos, "edit refused on a clue");
            return;
        }
        if self.state.set(pos.row, pos.col, value).is_err() {
            return;
        }
        let source = if value == 0 {
            FillSource::Empty
        } else {
            FillSource::User
        };
        self.state.set_fill_source(pos, source);
        self.state.recompute_errors();
    }

    /// Change the generator difficulty; refused while a puzzle is being generated
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.loading.generate {
            return false;
        }
        self.difficulty = difficulty;
        true
    }

    /// Full reset: empty board, no clues, overlays cleared, timer at zero
    pub fn clear(&mut self) {
        self.sequencer.cancel();
        self.state.reset();
        self.cursor = None;
        self.timer.reset();
        self.pending_message = None;
        self.message = Some(Message::new(MSG_CLEARED, MessageTone::Info));
        info!("board cleared");
    }

    // ==================== Remote actions ====================

    /// Begin fetching a new puzzle at the selected difficulty
    pub fn request_new_puzzle(&mut self, now: Instant) -> Option<ServiceRequest> {
        self.begin(ServiceAction::Generate)?;
        self.state.clear_errors();
        self.timer.start(now);
        Some(ServiceRequest::Generate {
            difficulty: self.difficulty,
        })
    }

    /// Begin solving the current board
    pub fn request_solve(&mut self, _now: Instant) -> Option<ServiceRequest> {
        self.begin(ServiceAction::Solve)?;
        self.timer.stop();
        Some(ServiceRequest::Solve {
            board: *self.state.values(),
            with_steps: self.config.trace_steps,
        })
    }

    /// Flag local conflicts now and ask the service whether the board is solved
    pub fn request_validate(&mut self, _now: Instant) -> Option<ServiceRequest> {
        self.begin(ServiceAction::Validate)?;
        self.state.recompute_errors();
        Some(ServiceRequest::Validate {
            board: *self.state.values(),
        })
    }

    /// Begin recognizing a photographed puzzle
    pub fn request_upload(&mut self, image: PathBuf, now: Instant) -> Option<ServiceRequest> {
        self.begin(ServiceAction::Recognize)?;
        self.timer.start(now);
        self.state.set_fill_sources(FillSourceMap::default());
        Some(ServiceRequest::Recognize { image })
    }

    fn begin(&mut self, action: ServiceAction) -> Option<()> {
        if self.loading.get(action) {
            debug!(%action, "request refused, already in flight");
            return None;
        }
        self.loading.set(action, true);
        self.message = None;
        self.pending_message = None;
        Some(())
    }

    /// Apply the outcome of a request issued earlier
    pub fn complete(&mut self, reply: ServiceReply, now: Instant) {
        // The loading flag clears whatever the outcome
        self.loading.set(reply.action(), false);

        match reply {
            ServiceReply::Generated(result) => match result {
                Ok(response) => self.on_generated(response),
                Err(error) => self.fail(ServiceAction::Generate, error, true),
            },
            ServiceReply::Solved(result) => match result {
                Ok(response) => self.on_solved(response, now),
                Err(error) => self.fail(ServiceAction::Solve, error, false),
            },
            ServiceReply::Validated(result) => match result {
                Ok(response) => self.on_validated(response, now),
                Err(error) => self.fail(ServiceAction::Validate, error, false),
            },
            ServiceReply::Recognized(result) => match result {
                Ok(response) => self.on_recognized(response, now),
                Err(error) => self.fail(ServiceAction::Recognize, error, true),
            },
        }
    }

    fn on_generated(&mut self, response: GenerateResponse) {
        self.sequencer.cancel();
        self.state.replace_all(response.puzzle);
        info!(
            difficulty = %self.difficulty,
            clues = response.puzzle.filled_count(),
            "new puzzle installed"
        );
        debug!(puzzle = %response.puzzle.to_string_compact());
    }

    fn on_solved(&mut self, response: SolveResponse, now: Instant) {
        if let Some(message) = &response.message {
            debug!(%message, "solver message");
        }
        match response.steps {
            Some(steps) => {
                info!(steps = steps.len(), "replaying solver steps");
                let start =
                    self.sequencer
                        .start_replay(&mut self.state, steps, response.board, &mut self.cursor);
                self.begin_sequence(start, now);
            }
            None => {
                self.sequencer.cancel();
                self.state.install_values(response.board);
                self.celebrate(now);
            }
        }
    }

    fn on_validated(&mut self, response: ValidateResponse, now: Instant) {
        if response.is_valid {
            self.message = Some(Message::new(MSG_VALID, MessageTone::Success));
            self.timer.stop();
            self.celebrate(now);
        } else {
            self.message = Some(Message::new(MSG_INVALID, MessageTone::Error));
        }
    }

    fn on_recognized(&mut self, response: RecognizeResponse, now: Instant) {
        if let Some(message) = &response.message {
            info!(%message, "recognizer message");
        }
        match response.source_map {
            Some(sources) => {
                let start = self.sequencer.start_reveal(&mut self.state, response.board, sources);
                self.begin_sequence(start, now);
                self.pending_message = Some((
                    now + self.config.upload_notice_delay,
                    Message::new(MSG_IMAGE_PROCESSED, MessageTone::Info),
                ));
            }
            None => {
                self.sequencer.cancel();
                self.state.replace_all(response.board);
                info!(clues = response.board.filled_count(), "recognized puzzle installed");
            }
        }
    }

    fn fail(&mut self, action: ServiceAction, error: ServiceError, stop_timer: bool) {
        warn!(%action, %error, "service call failed");
        self.message = Some(Message::new(
            format!("{}: {}", action.error_prefix(), error),
            MessageTone::Error,
        ));
        if stop_timer {
            self.timer.stop();
        }
    }

    // ==================== Time ====================

    fn begin_sequence(&mut self, start: SequenceStart, now: Instant) {
        match start {
            // The first step fires on the next advance
            SequenceStart::Scheduled(tick) => self.ticks.schedule(now, tick),
            SequenceStart::Finished(kind) => self.on_sequence_finished(kind, now),
        }
    }

    fn on_sequence_finished(&mut self, kind: SequenceKind, now: Instant) {
        match kind {
            SequenceKind::Reveal => info!("reveal complete"),
            SequenceKind::Replay => {
                self.message = Some(Message::new(MSG_SOLVED, MessageTone::Success));
                self.timer.stop();
                self.celebrate(now);
            }
        }
    }

    fn interval(&self, kind: SequenceKind) -> Duration {
        match kind {
            SequenceKind::Reveal => self.config.reveal_interval,
            SequenceKind::Replay => self.config.replay_interval,
        }
    }

    fn celebrate(&mut self, now: Instant) {
        self.celebration_until = Some(now + self.config.celebration);
    }

    /// Run everything that has come due by `now`: the session timer,
    /// animation ticks (stale ones included), delayed messages and the
    /// celebration expiry.
    pub fn advance(&mut self, now: Instant) {
        self.timer.advance(now);

        while let Some(tick) = self.ticks.pop_due(now) {
            match self.sequencer.on_tick(tick, &mut self.state, &mut self.cursor) {
                TickOutcome::Stale => {}
                TickOutcome::Stepped { next } => {
                    let at = now + self.interval(next.kind);
                    self.ticks.schedule(at, next);
                }
                TickOutcome::Finished(kind) => self.on_sequence_finished(kind, now),
            }
        }

        if let Some((at, _)) = &self.pending_message {
            if *at <= now {
                self.message = self.pending_message.take().map(|(_, message)| message);
            }
        }

        if self.celebration_until.is_some_and(|until| until <= now) {
            self.celebration_until = None;
        }
    }

    /// The earliest moment at which [`advance`](Self::advance) has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.timer.next_deadline(),
            self.ticks.next_deadline(),
            self.pending_message.as_ref().map(|(at, _)| *at),
            self.celebration_until,
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // Getters
    pub fn state(&self) -> &GridState {
        &self.state
    }
    pub fn cursor(&self) -> Option<Position> {
        self.cursor
    }
    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
    pub fn loading(&self) -> LoadingFlags {
        self.loading
    }
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
    pub fn is_animating(&self) -> bool {
        self.sequencer.is_active()
    }
    pub fn animation_kind(&self) -> Option<SequenceKind> {
        self.sequencer.active_kind()
    }
    pub fn is_celebrating(&self, now: Instant) -> bool {
        self.celebration_until.is_some_and(|until| now < until)
    }
}
