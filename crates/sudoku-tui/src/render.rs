use crate::app::{App, InputMode, NumpadKey};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io;
use std::time::Instant;
use sudoku_board::{MessageTone, Position, SequenceKind};

/// Grid is 37 chars wide x 19 tall: 9 cells of 3 chars plus 10 borders
pub const GRID_WIDTH: u16 = 37;
pub const GRID_HEIGHT: u16 = 19;

/// Numpad box: border, three digit rows, erase row, border
pub const NUMPAD_WIDTH: u16 = 11;
pub const NUMPAD_HEIGHT: u16 = 6;

const INFO_WIDTH: u16 = 25;

/// Map a screen coordinate to the grid cell under it. Borders map to nothing.
pub fn cell_at(origin: (u16, u16), x: u16, y: u16) -> Option<Position> {
    let dx = x.checked_sub(origin.0)?;
    let dy = y.checked_sub(origin.1)?;
    if dx % 4 == 0 || dy % 2 == 0 {
        return None;
    }
    Position::try_new((dy / 2) as usize, (dx / 4) as usize)
}

/// Map a screen coordinate to the numpad button under it
pub fn numpad_key_at(origin: (u16, u16), x: u16, y: u16) -> Option<NumpadKey> {
    let dx = x.checked_sub(origin.0 + 1)?;
    let dy = y.checked_sub(origin.1 + 1)?;
    if dx >= NUMPAD_WIDTH - 2 {
        return None;
    }
    match dy {
        0..=2 => Some(NumpadKey::Digit((dy * 3 + dx / 3 + 1) as u8)),
        3 if (1..8).contains(&dx) => Some(NumpadKey::Erase),
        _ => None,
    }
}

pub fn render(stdout: &mut io::Stdout, app: &mut App, now: Instant) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;
    app.confetti.resize(term_width, term_height);

    execute!(stdout, Hide, SetBackgroundColor(app.theme.bg), Clear(ClearType::All))?;

    // Center the grid horizontally, leave room for info panel
    let total_width = GRID_WIDTH + 3 + INFO_WIDTH;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = if term_height > GRID_HEIGHT + 8 { 2 } else { 1 };

    let info_x = start_x + GRID_WIDTH + 3;
    app.layout.grid = (start_x, start_y);
    app.layout.numpad = (info_x, start_y + 11);

    render_grid(stdout, app, start_x, start_y)?;
    render_info_panel(stdout, app, info_x, start_y, now)?;
    render_controls(stdout, app, start_x, start_y + GRID_HEIGHT + 1)?;

    match app.mode {
        InputMode::Numpad => render_numpad(stdout, app)?,
        InputMode::UploadPrompt => render_prompt(stdout, app, start_x, start_y + GRID_HEIGHT + 6)?,
        InputMode::Normal => {}
    }

    render_message(stdout, app, term_width)?;
    render_confetti(stdout, app, term_width, term_height)?;

    execute!(stdout, Show)?;
    Ok(())
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    const THICK: &str = "+===+===+===+===+===+===+===+===+===+";
    const THIN: &str = "+---+---+---+---+---+---+---+---+---+";

    execute!(
        stdout,
        SetBackgroundColor(theme.bg),
        MoveTo(x, y),
        SetForegroundColor(theme.box_border),
        Print(THICK)
    )?;

    for row in 0..9 {
        let cell_y = y + 1 + row as u16 * 2;
        execute!(stdout, MoveTo(x, cell_y))?;

        for col in 0..9 {
            // Thick borders at 3x3 boundaries
            if col % 3 == 0 {
                execute!(stdout, SetForegroundColor(theme.box_border), Print('║'))?;
            } else {
                execute!(stdout, SetForegroundColor(theme.border), Print('│'))?;
            }
            render_cell(stdout, app, Position::new(row, col))?;
        }
        execute!(stdout, SetForegroundColor(theme.box_border), Print('║'))?;

        let (color, line) = if (row + 1) % 3 == 0 {
            (theme.box_border, THICK)
        } else {
            (theme.border, THIN)
        };
        execute!(stdout, MoveTo(x, cell_y + 1), SetForegroundColor(color), Print(line))?;
    }

    Ok(())
}

fn render_cell(stdout: &mut io::Stdout, app: &App, pos: Position) -> io::Result<()> {
    let theme = &app.theme;
    let state = app.board.state();
    let value = state.value(pos);

    let bg = if app.board.cursor() == Some(pos) {
        theme.selected_bg
    } else {
        theme.bg
    };

    if value == 0 {
        return execute!(
            stdout,
            SetBackgroundColor(bg),
            SetForegroundColor(theme.border),
            Print(" · "),
            SetBackgroundColor(theme.bg)
        );
    }

    let fg = theme.digit_color(
        state.has_error(pos),
        state.is_fixed(pos),
        state.provenance_at(pos),
        state.fill_source(pos),
    );
    execute!(
        stdout,
        SetBackgroundColor(bg),
        SetForegroundColor(fg),
        Print(format!(" {} ", value)),
        SetBackgroundColor(theme.bg)
    )
}

/// What the board is busy with, if anything
fn status_line(app: &App) -> Option<&'static str> {
    let loading = app.board.loading();
    if loading.generate {
        Some("Generating...")
    } else if loading.solve {
        Some("Solving...")
    } else if loading.validate {
        Some("Validating...")
    } else if loading.upload {
        Some("Processing image...")
    } else {
        match app.board.animation_kind() {
            Some(SequenceKind::Reveal) => Some("Revealing..."),
            Some(SequenceKind::Replay) => Some("Replaying..."),
            None => None,
        }
    }
}

fn render_info_panel(
    stdout: &mut io::Stdout,
    app: &App,
    x: u16,
    y: u16,
    now: Instant,
) -> io::Result<()> {
    let theme = &app.theme;
    let board = &app.board;

    execute!(
        stdout,
        SetBackgroundColor(theme.bg),
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("═══ SUDOKU ═══")
    )?;

    let time_color = if board.timer().is_running() {
        theme.fg
    } else {
        theme.info
    };
    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.info),
        Print("Time: "),
        SetForegroundColor(time_color),
        Print(format!("{:>10}", board.timer().display()))
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 4),
        SetForegroundColor(theme.info),
        Print(format!("Level: {:>9}", board.difficulty().to_string()))
    )?;

    let filled = board.state().values().filled_count();
    execute!(
        stdout,
        MoveTo(x, y + 6),
        SetForegroundColor(theme.info),
        Print(format!("Filled: {:>5}/81", filled))
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 8),
        SetForegroundColor(theme.info),
        Print(format!("Backend: {:>7}", app.backend_name()))
    )?;

    if let Some(status) = status_line(app) {
        execute!(
            stdout,
            MoveTo(x, y + 9),
            SetForegroundColor(theme.key),
            Print(status)
        )?;
    } else if board.is_celebrating(now) {
        execute!(
            stdout,
            MoveTo(x, y + 9),
            SetForegroundColor(theme.success),
            Print("Solved!")
        )?;
    }

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let controls = [
        ("hjkl/Arrows", "Move"),
        ("1-9", "Set"),
        ("0/Del", "Erase"),
        ("click", "Numpad"),
        ("n", "New puzzle"),
        ("s", "Solve"),
        ("v", "Validate"),
        ("o", "Upload image"),
        ("c", "Clear"),
        ("d", "Difficulty"),
        ("t", "Theme"),
        ("q", "Quit"),
    ];

    // Display in 3 columns (4 items each)
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 4;
        let row = i % 4;
        let cx = x + (col as u16) * 19;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>11}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_numpad(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let theme = &app.theme;
    let (x, y) = app.layout.numpad;

    let lines = [
        "┌─────────┐",
        "│ 1  2  3 │",
        "│ 4  5  6 │",
        "│ 7  8  9 │",
        "│ [Erase] │",
        "└─────────┘",
    ];
    for (i, line) in lines.iter().enumerate() {
        let color = if i == 0 || i == lines.len() - 1 {
            theme.border
        } else {
            theme.key
        };
        execute!(
            stdout,
            MoveTo(x, y + i as u16),
            SetBackgroundColor(theme.bg),
            SetForegroundColor(color),
            Print(line)
        )?;
    }
    execute!(
        stdout,
        MoveTo(x, y + NUMPAD_HEIGHT),
        SetForegroundColor(theme.info),
        Print("Esc to close")
    )?;

    Ok(())
}

fn render_prompt(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.key),
        Print("Image path: "),
        SetForegroundColor(theme.fg),
        Print(&app.prompt),
        Print('_'),
        MoveTo(x, y + 1),
        SetForegroundColor(theme.info),
        Print("Enter to upload, Esc to cancel")
    )
}

fn render_message(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let Some(message) = app.board.message() else {
        return Ok(());
    };
    let theme = &app.theme;
    let color = match message.tone {
        MessageTone::Info => theme.fg,
        MessageTone::Success => theme.success,
        MessageTone::Error => theme.error,
    };

    let padded = format!("  {}  ", message.text);
    let width = padded.chars().count() as u16;
    let x = term_width.saturating_sub(width) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(color),
        SetBackgroundColor(theme.selected_bg),
        Print(&padded),
        SetBackgroundColor(theme.bg)
    )
}

fn render_confetti(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    for particle in app.confetti.particles() {
        if particle.is_visible(term_width, term_height) {
            execute!(
                stdout,
                MoveTo(particle.x as u16, particle.y as u16),
                SetForegroundColor(particle.color),
                SetBackgroundColor(Color::Reset),
                Print(particle.char)
            )?;
        }
    }
    execute!(stdout, SetBackgroundColor(app.theme.bg))
}
