use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side length of the board
pub const SIZE: usize = 9;

/// A cell coordinate on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row < SIZE && col < SIZE, "position ({row}, {col}) off the board");
        Self { row, col }
    }

    /// Checked constructor for coordinates coming from outside the crate
    pub fn try_new(row: usize, col: usize) -> Option<Self> {
        (row < SIZE && col < SIZE).then_some(Self { row, col })
    }

    /// Index of the 3x3 box containing this position (0-8, row-major)
    pub fn box_index(&self) -> usize {
        (self.row / 3) * 3 + self.col / 3
    }

    /// All 81 positions in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| Position { row, col }))
    }
}

/// A fixed 9x9 array of per-cell values.
///
/// `CellMap` is a plain value: copying it (or taking a snapshot of it) never
/// shares storage with its source, so a snapshot held by an animation run
/// can't be disturbed by later edits to the live board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CellMap<T>([[T; SIZE]; SIZE]);

/// Digit grid, 0 = empty
pub type Grid = CellMap<u8>;
/// How each cell was most recently written
pub type FillSourceMap = CellMap<FillSource>;
/// Why each filled cell holds its value
pub type ProvenanceMap = CellMap<Provenance>;
/// Per-cell constraint violation flags
pub type ErrorMap = CellMap<bool>;

impl<T: Copy> CellMap<T> {
    /// A map with every cell set to `value`
    pub fn filled(value: T) -> Self {
        Self([[value; SIZE]; SIZE])
    }

    pub fn get(&self, pos: Position) -> T {
        self.0[pos.row][pos.col]
    }

    pub fn set(&mut self, pos: Position, value: T) {
        self.0[pos.row][pos.col] = value;
    }

    /// Iterate over every cell with its position, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, T)> + '_ {
        Position::all().map(move |pos| (pos, self.get(pos)))
    }

    /// Build a new map by applying `f` to every cell
    pub fn map<U: Copy>(&self, mut f: impl FnMut(Position, T) -> U) -> CellMap<U> {
        CellMap(std::array::from_fn(|row| {
            std::array::from_fn(|col| f(Position { row, col }, self.0[row][col]))
        }))
    }
}

impl<T: Copy + Default> Default for CellMap<T> {
    fn default() -> Self {
        Self::filled(T::default())
    }
}

/// Grids arrive from the service as 9x9 arrays of 0-9; anything else is
/// rejected at decode time instead of reaching the board.
impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = <[[u8; SIZE]; SIZE]>::deserialize(deserializer)?;
        for (row, cells) in rows.iter().enumerate() {
            if let Some(col) = cells.iter().position(|&v| v > 9) {
                return Err(D::Error::custom(format!(
                    "cell ({row}, {col}) holds {}, expected 0-9",
                    cells[col]
                )));
            }
        }
        Ok(Self(rows))
    }
}

impl<'de> Deserialize<'de> for FillSourceMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <[[FillSource; SIZE]; SIZE]>::deserialize(deserializer).map(Self)
    }
}

impl Grid {
    pub fn empty() -> Self {
        Self::filled(0)
    }

    /// Number of non-zero cells
    pub fn filled_count(&self) -> usize {
        self.iter().filter(|&(_, v)| v != 0).count()
    }

    /// Parse an 81-character string, `0` or `.` for empty cells
    pub fn from_string(s: &str) -> Option<Self> {
        let digits: Vec<u8> = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '.' => Some(0),
                c => c.to_digit(10).map(|d| d as u8),
            })
            .collect::<Option<_>>()?;
        if digits.len() != SIZE * SIZE {
            return None;
        }
        let mut grid = Self::empty();
        for (pos, value) in Position::all().zip(digits) {
            grid.set(pos, value);
        }
        Some(grid)
    }

    /// Compact 81-character form, `.` for empty cells and `?` for anything
    /// that isn't a digit
    pub fn to_string_compact(&self) -> String {
        self.iter()
            .map(|(_, v)| match v {
                0 => '.',
                1..=9 => char::from(b'0' + v),
                _ => '?',
            })
            .collect()
    }
}

/// How a cell's value was most recently written. Styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillSource {
    #[default]
    Empty,
    /// Typed by the player
    User,
    /// Written by the recognition reveal
    Ocr,
}

impl<'de> Deserialize<'de> for FillSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "user" => FillSource::User,
            "ocr" => FillSource::Ocr,
            _ => FillSource::Empty,
        })
    }
}

/// Why a filled cell holds its value, as classified by a solve replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    #[default]
    Empty,
    /// A clue present when the replay began
    Question,
    /// Filled in by the solver
    Answer,
}

/// Puzzle difficulty offered by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Query-string form used by the generator
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// The next level, wrapping from hard back to easy
    pub fn cycle(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}' (expected easy, medium or hard)")),
        }
    }
}

/// Cursor movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }
}
