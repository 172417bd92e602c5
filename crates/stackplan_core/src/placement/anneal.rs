//! Simulated annealing layout refinement.
//!
//! Starting from a legal layout, repeatedly relocates one random block within
//! its layer and accepts or rejects the move using the Metropolis criterion.
//! The temperature decays geometrically every iteration, so cost-increasing
//! moves become less likely to be accepted over time. The best layout ever
//! observed is kept as an independent snapshot and returned at the end.

use crate::data::{Connection, Layout};
use crate::placement::cost::EnergyWeights;
use crate::placement::random::relocate_block;
use rand::Rng;
use serde::{Deserialize, Serialize};
use stackplan_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};

/// Iterations between progress notes emitted by [`Annealer::run`].
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Annealing schedule and move budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnealParams {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// Fraction of the temperature removed every iteration.
    pub cooling_rate: f64,
    /// The search stops once the temperature is at or below this value.
    pub min_temperature: f64,
    /// Hard cap on iterations, counting skipped moves.
    pub max_iterations: u64,
    /// Random relocations tried before a move is dropped.
    pub max_placement_attempts_per_move: u32,
}

impl Default for AnnealParams {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            cooling_rate: 0.003,
            min_temperature: 1.0,
            max_iterations: 10_000,
            max_placement_attempts_per_move: 100,
        }
    }
}

/// Lifecycle of an annealing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnealState {
    /// More iterations remain.
    Running,
    /// Temperature or iteration budget exhausted; `best` is final.
    Converged,
}

/// What happened during one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The relocated layout replaced the current one.
    Accepted,
    /// The relocation was legal but lost the Metropolis draw.
    Rejected,
    /// The randomly chosen layer holds no blocks.
    SkippedEmptyLayer,
    /// No legal position was found for the chosen block.
    SkippedNoLegalMove,
}

/// Per-outcome counters for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnealStats {
    /// Iterations performed, including skipped ones.
    pub iterations: u64,
    /// Moves accepted.
    pub accepted: u64,
    /// Legal moves rejected by the Metropolis draw.
    pub rejected: u64,
    /// Iterations that picked an empty layer.
    pub skipped_empty_layer: u64,
    /// Iterations whose block could not be relocated.
    pub skipped_no_legal_move: u64,
    /// Accepted moves that also improved the best energy.
    pub best_improvements: u64,
}

impl AnnealStats {
    fn record(&mut self, outcome: MoveOutcome) {
        self.iterations += 1;
        match outcome {
            MoveOutcome::Accepted => self.accepted += 1,
            MoveOutcome::Rejected => self.rejected += 1,
            MoveOutcome::SkippedEmptyLayer => self.skipped_empty_layer += 1,
            MoveOutcome::SkippedNoLegalMove => self.skipped_no_legal_move += 1,
        }
    }
}

/// The outcome of a finished run.
#[derive(Debug, Clone)]
pub struct AnnealResult {
    /// Lowest-energy layout observed.
    pub layout: Layout,
    /// Energy of [`layout`](Self::layout).
    pub energy: f64,
    /// Iteration counters.
    pub stats: AnnealStats,
    /// Temperature when the run stopped.
    pub final_temperature: f64,
}

/// Iterative optimizer over a private copy of a layout.
///
/// `current` and `best` are separate deep copies; neither aliases the input
/// layout or each other.
pub struct Annealer<'c> {
    connectivity: &'c [Connection],
    params: AnnealParams,
    weights: EnergyWeights,
    current: Layout,
    current_energy: f64,
    best: Layout,
    best_energy: f64,
    temperature: f64,
    stats: AnnealStats,
}

impl<'c> Annealer<'c> {
    /// Prepares a run starting from a copy of `layout`.
    pub fn new(
        layout: &Layout,
        connectivity: &'c [Connection],
        params: AnnealParams,
        weights: EnergyWeights,
    ) -> Self {
        let current = layout.clone();
        let current_energy = weights.energy(&current, connectivity);
        Self {
            connectivity,
            params,
            weights,
            best: current.clone(),
            best_energy: current_energy,
            current,
            current_energy,
            temperature: params.initial_temperature,
            stats: AnnealStats::default(),
        }
    }

    /// Returns whether further iterations will run.
    pub fn state(&self) -> AnnealState {
        if self.temperature <= self.params.min_temperature
            || self.stats.iterations >= self.params.max_iterations
        {
            AnnealState::Converged
        } else {
            AnnealState::Running
        }
    }

    /// Performs one iteration and cools the temperature.
    ///
    /// Returns `None` without drawing any random values once converged.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<MoveOutcome> {
        if self.state() == AnnealState::Converged {
            return None;
        }

        let outcome = self.propose(rng);
        self.stats.record(outcome);
        self.temperature *= 1.0 - self.params.cooling_rate;
        Some(outcome)
    }

    /// Relocates one block on a candidate copy and applies the Metropolis rule.
    ///
    /// Random values are drawn in a fixed order: layer, block, relocation
    /// positions, then the acceptance draw (only for non-improving moves).
    fn propose<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MoveOutcome {
        let layer = rng.gen_range(0..self.current.layer_count());
        let len = self.current.layer_len(layer);
        if len == 0 {
            return MoveOutcome::SkippedEmptyLayer;
        }
        let index = self.current.layer_slot(layer, rng.gen_range(0..len));

        let mut candidate = self.current.clone();
        if !relocate_block(
            &mut candidate,
            index,
            self.params.max_placement_attempts_per_move,
            rng,
        ) {
            return MoveOutcome::SkippedNoLegalMove;
        }

        let candidate_energy = self.weights.energy(&candidate, self.connectivity);
        let delta = candidate_energy - self.current_energy;
        let accept = delta < 0.0 || rng.gen::<f64>() < (-delta / self.temperature).exp();
        if !accept {
            return MoveOutcome::Rejected;
        }

        if candidate_energy < self.best_energy {
            self.best = candidate.clone();
            self.best_energy = candidate_energy;
            self.stats.best_improvements += 1;
        }
        self.current = candidate;
        self.current_energy = candidate_energy;
        MoveOutcome::Accepted
    }

    /// Iterates until converged, reporting progress into `sink`.
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R, sink: &DiagnosticSink) -> AnnealResult {
        let starting_energy = self.current_energy;

        while self.step(rng).is_some() {
            if self.stats.iterations % PROGRESS_INTERVAL == 0 {
                sink.emit(Diagnostic::note(
                    DiagnosticCode::new(Category::Anneal, 1),
                    format!(
                        "iteration {}, temperature {:.2}, best energy {:.2}",
                        self.stats.iterations, self.temperature, self.best_energy
                    ),
                ));
            }
        }

        sink.emit(
            Diagnostic::note(
                DiagnosticCode::new(Category::Anneal, 2),
                format!(
                    "annealing finished after {} iterations: energy {:.2} -> {:.2}",
                    self.stats.iterations, starting_energy, self.best_energy
                ),
            )
            .with_note(format!(
                "{} accepted, {} rejected, {} empty-layer skips, {} blocked moves",
                self.stats.accepted,
                self.stats.rejected,
                self.stats.skipped_empty_layer,
                self.stats.skipped_no_legal_move
            )),
        );

        self.finish()
    }

    /// Stops the run and returns the best layout seen so far.
    pub fn finish(self) -> AnnealResult {
        AnnealResult {
            layout: self.best,
            energy: self.best_energy,
            stats: self.stats,
            final_temperature: self.temperature,
        }
    }

    /// Returns the current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Returns the iteration counters so far.
    pub fn stats(&self) -> &AnnealStats {
        &self.stats
    }

    /// Returns the working layout.
    pub fn current(&self) -> &Layout {
        &self.current
    }

    /// Returns the energy of the working layout.
    pub fn current_energy(&self) -> f64 {
        self.current_energy
    }

    /// Returns the best layout observed so far.
    pub fn best(&self) -> &Layout {
        &self.best
    }

    /// Returns the energy of the best layout observed so far.
    pub fn best_energy(&self) -> f64 {
        self.best_energy
    }
}

/// Refines `layout` by simulated annealing and returns the best layout found.
///
/// The input layout is left untouched. Never fails: blocked moves and empty
/// layers only consume iterations.
pub fn anneal<R: Rng + ?Sized>(
    layout: &Layout,
    connectivity: &[Connection],
    params: AnnealParams,
    weights: EnergyWeights,
    rng: &mut R,
    sink: &DiagnosticSink,
) -> AnnealResult {
    Annealer::new(layout, connectivity, params, weights).run(rng, sink)
}
