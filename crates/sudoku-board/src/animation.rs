//! Timed playback of recognition and solver results.
//!
//! Two kinds of sequence exist: the *reveal*, which places recognized
//! digits one at a time, and the *replay*, which walks through solver steps
//! one at a time. At most one sequence is active. Every start hands out a
//! fresh [`SequenceId`]; each scheduled [`Tick`] carries the id of the run
//! that scheduled it, and a tick whose id is not the active one does
//! nothing. Superseded runs are never cancelled explicitly, their remaining
//! ticks simply fire as no-ops.
//!
//! The sequencer does not own a clock. Callers schedule the returned ticks
//! and hand them back through [`AnimationSequencer::on_tick`] when due.

use crate::grid::GridState;
use crate::service::SolveStep;
use crate::types::{FillSource, FillSourceMap, Grid, Position, Provenance, ProvenanceMap};
use tracing::{debug, warn};

/// Identifies one run of one sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    Reveal,
    Replay,
}

/// A scheduled step of a sequence run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub sequence: SequenceId,
    pub kind: SequenceKind,
    pub step: usize,
}

/// What starting a sequence produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStart {
    /// The first tick to schedule
    Scheduled(Tick),
    /// Nothing to animate; the final state is already installed
    Finished(SequenceKind),
}

/// What firing a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Superseded or out-of-range tick; nothing changed
    Stale,
    /// One cell was written; schedule `next`
    Stepped { next: Tick },
    /// The sequence reached its end state
    Finished(SequenceKind),
}

struct RevealRun {
    /// Recognized cells still to place, row-major
    queue: Vec<(Position, u8)>,
    final_grid: Grid,
    final_sources: FillSourceMap,
}

struct ReplayRun {
    steps: Vec<SolveStep>,
    final_grid: Grid,
    /// Board as it stood when the replay began (fixed mask, or the grid if none)
    initial: Grid,
    working_grid: Grid,
    working_origin: ProvenanceMap,
}

enum Run {
    Reveal(RevealRun),
    Replay(ReplayRun),
}

impl Run {
    fn kind(&self) -> SequenceKind {
        match self {
            Run::Reveal(_) => SequenceKind::Reveal,
            Run::Replay(_) => SequenceKind::Replay,
        }
    }
}

struct ActiveSequence {
    id: SequenceId,
    next_step: usize,
    run: Run,
}

/// Owns the currently active sequence, if any
#[derive(Default)]
pub struct AnimationSequencer {
    active: Option<ActiveSequence>,
    last_id: u64,
}

impl std::fmt::Debug for AnimationSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationSequencer")
            .field("active", &self.active.as_ref().map(|a| (a.id, a.run.kind(), a.next_step)))
            .field("last_id", &self.last_id)
            .finish()
    }
}

impl AnimationSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> SequenceId {
        self.last_id += 1;
        SequenceId(self.last_id)
    }

    /// Invalidate whatever is running; its pending ticks become no-ops
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            debug!(sequence = ?active.id, kind = ?active.run.kind(), "sequence cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_kind(&self) -> Option<SequenceKind> {
        self.active.as_ref().map(|a| a.run.kind())
    }

    /// Start revealing a recognized board.
    ///
    /// The board is emptied (no fixed cells, overlays cleared), then every
    /// cell tagged [`FillSource::Ocr`] with a non-zero value is queued in
    /// row-major order. With an empty queue the final board is installed
    /// at once.
    pub fn start_reveal(
        &mut self,
        state: &mut GridState,
        recognized: Grid,
        sources: FillSourceMap,
    ) -> SequenceStart {
        let id = self.fresh_id();
        state.reset();

        let queue: Vec<(Position, u8)> = recognized
            .iter()
            .filter(|&(pos, value)| value != 0 && sources.get(pos) == FillSource::Ocr)
            .collect();

        let run = RevealRun {
            queue,
            final_grid: recognized,
            final_sources: sources,
        };

        if run.queue.is_empty() {
            self.active = None;
            finish_reveal(state, &run);
            debug!(sequence = ?id, "reveal had nothing to animate");
            return SequenceStart::Finished(SequenceKind::Reveal);
        }

        debug!(sequence = ?id, cells = run.queue.len(), "reveal started");
        self.active = Some(ActiveSequence {
            id,
            next_step: 0,
            run: Run::Reveal(run),
        });
        SequenceStart::Scheduled(Tick {
            sequence: id,
            kind: SequenceKind::Reveal,
            step: 0,
        })
    }

    /// Start replaying solver steps.
    ///
    /// The current fixed mask (or the current grid when there is none) is
    /// snapshotted; its non-zero cells are tagged [`Provenance::Question`]
    /// immediately. An empty step list finishes at once.
    pub fn start_replay(
        &mut self,
        state: &mut GridState,
        steps: Vec<SolveStep>,
        final_grid: Grid,
        cursor: &mut Option<Position>,
    ) -> SequenceStart {
        let id = self.fresh_id();

        let initial = state.fixed_mask().copied().unwrap_or(*state.values());
        let origin = initial.map(|_, value| {
            if value != 0 {
                Provenance::Question
            } else {
                Provenance::Empty
            }
        });
        state.set_provenance(origin);

        let run = ReplayRun {
            steps,
            final_grid,
            initial,
            working_grid: *state.values(),
            working_origin: origin,
        };

        if run.steps.is_empty() {
            self.active = None;
            finish_replay(state, &run, cursor);
            debug!(sequence = ?id, "replay had no steps");
            return SequenceStart::Finished(SequenceKind::Replay);
        }

        debug!(sequence = ?id, steps = run.steps.len(), "replay started");
        self.active = Some(ActiveSequence {
            id,
            next_step: 0,
            run: Run::Replay(run),
        });
        SequenceStart::Scheduled(Tick {
            sequence: id,
            kind: SequenceKind::Replay,
            step: 0,
        })
    }

    /// Fire a scheduled tick.
    ///
    /// Ticks from a superseded run, or whose step is not the one the active
    /// run expects next, return [`TickOutcome::Stale`] without touching
    /// anything.
    pub fn on_tick(
        &mut self,
        tick: Tick,
        state: &mut GridState,
        cursor: &mut Option<Position>,
    ) -> TickOutcome {
        let Some(active) = self.active.as_mut() else {
            debug!(sequence = ?tick.sequence, "tick after sequence ended");
            return TickOutcome::Stale;
        };
        if active.id != tick.sequence || active.next_step != tick.step {
            debug!(sequence = ?tick.sequence, step = tick.step, "stale tick ignored");
            return TickOutcome::Stale;
        }

        let id = active.id;
        let step = active.next_step;
        let kind = active.run.kind();
        let finished = match &mut active.run {
            Run::Reveal(run) => match run.queue.get(step) {
                Some(&(pos, value)) => {
                    let mut grid = *state.values();
                    grid.set(pos, value);
                    state.install_values(grid);
                    state.set_fill_source(pos, FillSource::Ocr);
                    false
                }
                None => {
                    finish_reveal(state, run);
                    true
                }
            },
            Run::Replay(run) => match run.steps.get(step).copied() {
                Some(solve_step) => {
                    apply_replay_step(state, run, solve_step, cursor);
                    false
                }
                None => {
                    finish_replay(state, run, cursor);
                    true
                }
            },
        };

        if finished {
            self.active = None;
            debug!(sequence = ?id, ?kind, "sequence finished");
            return TickOutcome::Finished(kind);
        }

        active.next_step += 1;
        TickOutcome::Stepped {
            next: Tick {
                sequence: id,
                kind,
                step: step + 1,
            },
        }
    }
}

fn finish_reveal(state: &mut GridState, run: &RevealRun) {
    state.install_values(run.final_grid);
    state.set_fill_sources(run.final_sources);
    state.set_fixed(Some(run.final_grid));
}

fn apply_replay_step(
    state: &mut GridState,
    run: &mut ReplayRun,
    solve_step: SolveStep,
    cursor: &mut Option<Position>,
) {
    let Some(pos) = Position::try_new(solve_step.row, solve_step.col) else {
        warn!(?solve_step, "solver step off the board skipped");
        return;
    };
    *cursor = Some(pos);

    if solve_step.value > 9 {
        warn!(?solve_step, "solver step with invalid digit skipped");
        return;
    }
    if run.initial.get(pos) != 0 {
        warn!(?solve_step, "solver step targets a clue; skipped");
        return;
    }

    run.working_grid.set(pos, solve_step.value);
    if solve_step.value != 0 {
        run.working_origin.set(pos, Provenance::Answer);
    }
    state.install_values(run.working_grid);
    state.set_provenance(run.working_origin);
}

fn finish_replay(state: &mut GridState, run: &ReplayRun, cursor: &mut Option<Position>) {
    // The supplied final grid is authoritative over the accumulated one
    state.install_values(run.final_grid);
    let initial = run.initial;
    let provenance = run.final_grid.map(|pos, value| {
        if initial.get(pos) != 0 {
            Provenance::Question
        } else if value != 0 {
            Provenance::Answer
        } else {
            Provenance::Empty
        }
    });
    state.set_provenance(provenance);
    *cursor = None;
}
