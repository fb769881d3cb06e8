use crate::animations::Confetti;
use crate::render;
use crate::theme::{Theme, ThemeName};
use crate::worker::ServiceWorker;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use sudoku_board::{
    ControllerConfig, Difficulty, Direction, InputEvent, InteractionController, ServiceRequest,
};
use tracing::info;

/// Frame interval while confetti is on screen (~30 FPS)
pub const FRAME: Duration = Duration::from_millis(33);

/// Longest the event loop sleeps when nothing is scheduled
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Input mode for the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Keys edit and navigate the board
    Normal,
    /// On-screen numpad open next to the board
    Numpad,
    /// Typing the path of an image to upload
    UploadPrompt,
}

/// A numpad button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumpadKey {
    Digit(u8),
    Erase,
}

/// Screen positions recorded by the last render, used to map mouse clicks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Layout {
    pub grid: (u16, u16),
    pub numpad: (u16, u16),
}

/// The main application state
pub struct App {
    /// The board engine
    pub board: InteractionController,
    pub mode: InputMode,
    /// Path typed so far in the upload prompt
    pub prompt: String,
    pub theme: Theme,
    pub confetti: Confetti,
    pub layout: Layout,
    worker: ServiceWorker,
    last_frame: Option<Instant>,
}

impl App {
    pub fn new(
        worker: ServiceWorker,
        config: ControllerConfig,
        difficulty: Difficulty,
        theme: ThemeName,
    ) -> Self {
        let mut board = InteractionController::new(config);
        board.set_difficulty(difficulty);
        Self {
            board,
            mode: InputMode::Normal,
            prompt: String::new(),
            theme: Theme::from_name(theme),
            confetti: Confetti::new(),
            layout: Layout::default(),
            worker,
            last_frame: None,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.worker.backend_name()
    }

    fn submit(&mut self, request: Option<ServiceRequest>) {
        if let Some(request) = request {
            self.worker.submit(request);
        }
    }

    /// Send an image to the recognizer
    pub fn upload(&mut self, path: PathBuf, now: Instant) {
        info!(path = %path.display(), "uploading image");
        let request = self.board.request_upload(path, now);
        self.submit(request);
    }

    /// Apply arrived replies and everything that has come due
    pub fn tick(&mut self, now: Instant) {
        for reply in self.worker.drain() {
            self.board.complete(reply, now);
        }
        self.board.advance(now);

        let frame_due = self
            .last_frame
            .map_or(true, |last| now.duration_since(last) >= FRAME);
        if frame_due {
            self.last_frame = Some(now);
            self.confetti.update(self.board.is_celebrating(now));
        }
    }

    /// How long the event loop may wait for input before the next tick
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let cap = if self.confetti.is_active() || self.board.is_celebrating(now) {
            FRAME
        } else {
            IDLE_POLL
        };
        self.board
            .next_deadline()
            .map_or(cap, |deadline| deadline.saturating_duration_since(now).min(cap))
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> AppAction {
        match self.mode {
            InputMode::UploadPrompt => {
                self.handle_prompt_key(key, now);
                AppAction::Continue
            }
            InputMode::Normal | InputMode::Numpad => self.handle_board_key(key, now),
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent, now: Instant) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,

            // Navigation
            KeyCode::Up | KeyCode::Char('k') => self.navigate(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => self.navigate(Direction::Down),
            KeyCode::Left | KeyCode::Char('h') => self.navigate(Direction::Left),
            KeyCode::Right | KeyCode::Char('l') => self.navigate(Direction::Right),

            // Number input
            KeyCode::Char(c @ '1'..='9') => {
                let value = c as u8 - b'0';
                self.board.handle_input(InputEvent::Digit(value));
            }
            KeyCode::Char('0') | KeyCode::Delete | KeyCode::Backspace => {
                self.board.handle_input(InputEvent::Erase)
            }

            // Remote actions
            KeyCode::Char('n') => {
                let request = self.board.request_new_puzzle(now);
                self.submit(request);
            }
            KeyCode::Char('s') => {
                let request = self.board.request_solve(now);
                self.submit(request);
            }
            KeyCode::Char('v') => {
                let request = self.board.request_validate(now);
                self.submit(request);
            }
            KeyCode::Char('o') => {
                if !self.board.loading().upload {
                    self.prompt.clear();
                    self.mode = InputMode::UploadPrompt;
                }
            }

            KeyCode::Char('c') => {
                self.board.clear();
                self.mode = InputMode::Normal;
            }
            KeyCode::Char('d') => {
                let next = self.board.difficulty().cycle();
                self.board.set_difficulty(next);
            }
            KeyCode::Char('t') => self.theme = self.theme.toggled(),
            KeyCode::Esc => self.mode = InputMode::Normal,
            _ => {}
        }
        AppAction::Continue
    }

    fn navigate(&mut self, direction: Direction) {
        self.board.handle_input(InputEvent::Navigate(direction));
    }

    fn handle_prompt_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                self.prompt.clear();
                self.mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                let path = self.prompt.trim().to_string();
                self.prompt.clear();
                self.mode = InputMode::Normal;
                if !path.is_empty() {
                    self.upload(PathBuf::from(path), now);
                }
            }
            KeyCode::Backspace => {
                self.prompt.pop();
            }
            KeyCode::Char(c) => self.prompt.push(c),
            _ => {}
        }
    }

    /// Handle a mouse event: clicks select cells and press numpad buttons
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if self.mode == InputMode::UploadPrompt {
            return;
        }

        if self.mode == InputMode::Numpad {
            if let Some(key) = render::numpad_key_at(self.layout.numpad, mouse.column, mouse.row) {
                let event = match key {
                    NumpadKey::Digit(value) => InputEvent::Digit(value),
                    NumpadKey::Erase => InputEvent::Erase,
                };
                self.board.handle_input(event);
                return;
            }
        }

        match render::cell_at(self.layout.grid, mouse.column, mouse.row) {
            Some(pos) => {
                self.board.handle_input(InputEvent::Select(pos));
                self.mode = InputMode::Numpad;
            }
            None => self.mode = InputMode::Normal,
        }
    }
}
