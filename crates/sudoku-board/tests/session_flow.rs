//! End-to-end sessions against the in-memory service.

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use sudoku_board::{
    controller::{MSG_IMAGE_PROCESSED, MSG_SOLVED},
    Difficulty, FillSource, FillSourceMap, Grid, InputEvent, InteractionController,
    MessageTone, MockPuzzleService, Position, Provenance, RecognizeResponse, ServiceAction,
    ServiceRequest, SolveResponse, SolveStep,
};

const PUZZLE: &str =
    "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
const SOLVED: &str =
    "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

fn grid(s: &str) -> Grid {
    Grid::from_string(s).unwrap()
}

/// Execute a request synchronously and feed the reply back
fn run(controller: &mut InteractionController, service: &MockPuzzleService, request: Option<ServiceRequest>, now: Instant) {
    let request = request.expect("request should have been issued");
    let reply = request.execute(service);
    controller.complete(reply, now);
}

/// Advance in fixed steps until nothing is animating
fn drain(controller: &mut InteractionController, mut now: Instant, step: Duration) -> Instant {
    controller.advance(now);
    while controller.is_animating() {
        now += step;
        controller.advance(now);
    }
    now
}

/// Every solver step for the blank cells, row-major
fn steps_for(puzzle: &Grid, solved: &Grid) -> Vec<SolveStep> {
    puzzle
        .iter()
        .filter(|&(_, value)| value == 0)
        .map(|(pos, _)| SolveStep {
            row: pos.row,
            col: pos.col,
            value: solved.get(pos),
        })
        .collect()
}

#[test]
fn generate_then_play_then_validate() {
    let service = MockPuzzleService::new()
        .with_puzzle(grid(PUZZLE))
        .with_validity(false);
    let mut controller = InteractionController::default();
    let t0 = Instant::now();

    assert!(controller.set_difficulty(Difficulty::Hard));
    let request = controller.request_new_puzzle(t0);
    assert_eq!(
        request,
        Some(ServiceRequest::Generate {
            difficulty: Difficulty::Hard
        })
    );
    run(&mut controller, &service, request, t0);
    assert_eq!(controller.state().fixed_mask(), Some(&grid(PUZZLE)));

    // Place a digit that clashes with the 5 at (0,0)
    controller.handle_input(InputEvent::Select(Position::new(0, 2)));
    controller.handle_input(InputEvent::Digit(5));
    assert!(controller.state().has_error(Position::new(0, 0)));
    assert!(controller.state().has_error(Position::new(0, 2)));

    let t1 = t0 + Duration::from_secs(42);
    controller.advance(t1);
    assert_eq!(controller.timer().display(), "00:42");

    let request = controller.request_validate(t1);
    run(&mut controller, &service, request, t1);
    let message = controller.message().unwrap();
    assert_eq!(message.tone, MessageTone::Error);
    assert!(controller.timer().is_running());

    assert_eq!(
        service.calls(),
        vec![ServiceAction::Generate, ServiceAction::Validate]
    );
}

#[test]
fn solve_replay_writes_each_step_and_tracks_cursor() {
    let puzzle = grid(PUZZLE);
    let solved = grid(SOLVED);
    let steps = steps_for(&puzzle, &solved);
    let n = steps.len();
    let service = MockPuzzleService::new()
        .with_puzzle(puzzle)
        .with_solution(SolveResponse {
            board: solved,
            steps: Some(steps.clone()),
            message: Some("Puzzle solved successfully".into()),
        });

    let mut controller = InteractionController::default();
    let mut now = Instant::now();
    let request = controller.request_new_puzzle(now);
    run(&mut controller, &service, request, now);
    let request = controller.request_solve(now);
    run(&mut controller, &service, request, now);

    let interval = controller.config().replay_interval;
    let mut cursors = Vec::new();
    for _ in 0..n {
        controller.advance(now);
        cursors.push(controller.cursor());
        now += interval;
    }
    let expected: Vec<_> = steps
        .iter()
        .map(|step| Some(Position::new(step.row, step.col)))
        .collect();
    assert_eq!(cursors, expected);

    // The final tick installs the solution
    controller.advance(now);
    assert!(!controller.is_animating());
    assert_eq!(controller.state().values(), &solved);
    assert_eq!(controller.cursor(), None);
    assert_eq!(controller.message().unwrap().text, MSG_SOLVED);
    for (pos, clue) in puzzle.iter() {
        let expected = if clue != 0 {
            Provenance::Question
        } else {
            Provenance::Answer
        };
        assert_eq!(controller.state().provenance_at(pos), expected);
    }
    // Replay leaves the clue mask as it was
    assert_eq!(controller.state().fixed_mask(), Some(&puzzle));
}

#[test]
fn backtracking_steps_replay_in_order() {
    let puzzle = grid(PUZZLE);
    let solved = grid(SOLVED);
    let steps = vec![
        SolveStep { row: 0, col: 2, value: 1 },
        SolveStep { row: 0, col: 2, value: 0 },
        SolveStep { row: 0, col: 2, value: 4 },
    ];
    let service = MockPuzzleService::new()
        .with_puzzle(puzzle)
        .with_solution(SolveResponse {
            board: solved,
            steps: Some(steps),
            message: None,
        });
    let mut controller = InteractionController::default();
    let t0 = Instant::now();
    let request = controller.request_new_puzzle(t0);
    run(&mut controller, &service, request, t0);
    let request = controller.request_solve(t0);
    run(&mut controller, &service, request, t0);

    let cell = Position::new(0, 2);
    let interval = controller.config().replay_interval;
    controller.advance(t0);
    assert_eq!(controller.state().value(cell), 1);
    controller.advance(t0 + interval);
    assert_eq!(controller.state().value(cell), 0);
    controller.advance(t0 + interval * 2);
    assert_eq!(controller.state().value(cell), 4);
}

#[test]
fn reveal_places_each_recognized_digit_then_fixes_board() {
    let recognized = grid(PUZZLE);
    let sources = recognized.map(|_, value| {
        if value != 0 {
            FillSource::Ocr
        } else {
            FillSource::Empty
        }
    });
    let k = recognized.filled_count();
    let service = MockPuzzleService::new().with_recognition(RecognizeResponse {
        board: recognized,
        source_map: Some(sources),
        message: Some("Image processed successfully".into()),
    });

    let mut controller = InteractionController::default();
    let mut now = Instant::now();
    let request = controller.request_upload(PathBuf::from("photo.jpg"), now);
    run(&mut controller, &service, request, now);

    // Board starts empty and editable
    assert_eq!(controller.state().values().filled_count(), 0);
    assert!(controller.state().fixed_mask().is_none());

    let interval = controller.config().reveal_interval;
    for written in 1..=k {
        controller.advance(now);
        assert_eq!(controller.state().values().filled_count(), written);
        now += interval;
    }
    controller.advance(now);
    assert!(!controller.is_animating());
    assert_eq!(controller.state().fixed_mask(), Some(&recognized));
    assert_eq!(controller.state().fill_sources(), &sources);

    let now = now + Duration::from_secs(1);
    controller.advance(now);
    assert_eq!(controller.message().unwrap().text, MSG_IMAGE_PROCESSED);
}

#[test]
fn new_solve_supersedes_running_reveal() {
    let recognized = grid(PUZZLE);
    let sources = recognized.map(|_, value| if value != 0 { FillSource::Ocr } else { FillSource::Empty });
    let solved = grid(SOLVED);
    let service = MockPuzzleService::new()
        .with_recognition(RecognizeResponse {
            board: recognized,
            source_map: Some(sources),
            message: None,
        })
        .with_solution(SolveResponse {
            board: solved,
            steps: Some(vec![SolveStep { row: 0, col: 2, value: 4 }]),
            message: None,
        });

    let mut controller = InteractionController::default();
    let t0 = Instant::now();
    let request = controller.request_upload(PathBuf::from("photo.jpg"), t0);
    run(&mut controller, &service, request, t0);
    controller.advance(t0);
    controller.advance(t0 + Duration::from_millis(40));
    assert_eq!(controller.state().values().filled_count(), 2);

    // Solve while the reveal is mid-flight; the reveal's pending tick goes stale
    let t1 = t0 + Duration::from_millis(50);
    let request = controller.request_solve(t1);
    run(&mut controller, &service, request, t1);
    let end = drain(&mut controller, t1, Duration::from_millis(10));
    controller.advance(end + Duration::from_millis(100));

    assert_eq!(controller.state().values(), &solved);
    assert_eq!(controller.message().unwrap().text, MSG_SOLVED);
}

#[test]
fn solve_without_trace_installs_directly() {
    let solved = grid(SOLVED);
    let service = MockPuzzleService::new().with_solution(SolveResponse {
        board: solved,
        steps: Some(vec![SolveStep { row: 0, col: 0, value: 5 }]),
        message: None,
    });
    let config = sudoku_board::ControllerConfig {
        trace_steps: false,
        ..Default::default()
    };
    let mut controller = InteractionController::new(config);
    let t0 = Instant::now();
    let request = controller.request_solve(t0);
    run(&mut controller, &service, request, t0);

    assert!(!controller.is_animating());
    assert_eq!(controller.state().values(), &solved);
    assert!(controller.is_celebrating(t0));
}

#[test]
fn transport_failure_clears_loading_and_reports() {
    let service = MockPuzzleService::new();
    service.set_available(false);
    let mut controller = InteractionController::default();
    let t0 = Instant::now();

    let request = controller.request_solve(t0);
    assert!(controller.loading().solve);
    run(&mut controller, &service, request, t0);

    assert!(!controller.loading().any());
    assert_eq!(
        controller.message().unwrap().text,
        "Error solving puzzle: Mock unavailable"
    );
}

#[test]
fn missing_response_surfaces_status_description() {
    let service = MockPuzzleService::new();
    let mut controller = InteractionController::default();
    let t0 = Instant::now();
    let request = controller.request_new_puzzle(t0);
    run(&mut controller, &service, request, t0);
    assert_eq!(
        controller.message().unwrap().text,
        "Error generating puzzle: Failed to generate puzzle"
    );
    assert!(!controller.timer().is_running());
}

#[test]
fn clear_mid_replay_leaves_empty_board() {
    let puzzle = grid(PUZZLE);
    let solved = grid(SOLVED);
    let service = MockPuzzleService::new()
        .with_puzzle(puzzle)
        .with_solution(SolveResponse {
            board: solved,
            steps: Some(steps_for(&puzzle, &solved)),
            message: None,
        });
    let mut controller = InteractionController::default();
    let t0 = Instant::now();
    let request = controller.request_new_puzzle(t0);
    run(&mut controller, &service, request, t0);
    let request = controller.request_solve(t0);
    run(&mut controller, &service, request, t0);
    controller.advance(t0);

    controller.clear();
    drain(&mut controller, t0, Duration::from_millis(10));
    controller.advance(t0 + Duration::from_secs(1));

    assert_eq!(controller.state().values(), &Grid::empty());
    assert_eq!(controller.state().fill_sources(), &FillSourceMap::default());
    assert_eq!(controller.cursor(), None);
}
