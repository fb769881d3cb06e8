//! Drive a board without a terminal: generate, make a few moves, then
//! replay a solver trace against the in-memory service.
//!
//! Run with `cargo run -p sudoku-board --example headless`.

use std::time::{Duration, Instant};
use sudoku_board::{
    Direction, Grid, InputEvent, InteractionController, MockPuzzleService, Position,
    ServiceRequest, SolveResponse, SolveStep,
};

const PUZZLE: &str =
    "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
const SOLVED: &str =
    "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

fn print_board(controller: &InteractionController) {
    let state = controller.state();
    for row in 0..9 {
        if row % 3 == 0 {
            println!("+-------+-------+-------+");
        }
        let mut line = String::new();
        for col in 0..9 {
            if col % 3 == 0 {
                line.push_str("| ");
            }
            let pos = Position::new(row, col);
            let cell = match state.value(pos) {
                0 => '.',
                v => char::from(b'0' + v),
            };
            line.push(cell);
            line.push(if state.has_error(pos) { '!' } else { ' ' });
        }
        println!("{line}|");
    }
    println!("+-------+-------+-------+");
}

fn submit(controller: &mut InteractionController, service: &MockPuzzleService, request: Option<ServiceRequest>, now: Instant) {
    if let Some(request) = request {
        let reply = request.execute(service);
        controller.complete(reply, now);
    }
}

fn main() {
    let (Some(puzzle), Some(solved)) = (Grid::from_string(PUZZLE), Grid::from_string(SOLVED)) else {
        eprintln!("bad fixture");
        return;
    };

    let steps: Vec<SolveStep> = puzzle
        .iter()
        .filter(|&(_, value)| value == 0)
        .map(|(pos, _)| SolveStep {
            row: pos.row,
            col: pos.col,
            value: solved.get(pos),
        })
        .collect();

    let service = MockPuzzleService::new()
        .with_puzzle(puzzle)
        .with_solution(SolveResponse {
            board: solved,
            steps: Some(steps),
            message: None,
        });

    let mut controller = InteractionController::default();
    let mut now = Instant::now();

    let request = controller.request_new_puzzle(now);
    submit(&mut controller, &service, request, now);
    println!("New puzzle:");
    print_board(&controller);

    // Move right from (0,0): (0,1) holds a clue, so the cursor skips to (0,2)
    controller.handle_input(InputEvent::Select(Position::new(0, 0)));
    controller.handle_input(InputEvent::Navigate(Direction::Right));
    controller.handle_input(InputEvent::Digit(3));
    println!("\nAfter a clashing 3 at {:?}:", controller.cursor());
    print_board(&controller);

    let request = controller.request_solve(now);
    submit(&mut controller, &service, request, now);
    while let Some(deadline) = controller.next_deadline() {
        if !controller.is_animating() {
            break;
        }
        now = deadline.max(now);
        controller.advance(now);
    }
    now += Duration::from_millis(1);
    controller.advance(now);

    println!("\nAfter replay:");
    print_board(&controller);
    if let Some(message) = controller.message() {
        println!("{}", message.text);
    }
}
