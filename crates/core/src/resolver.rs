//! Match resolver - run detection and removal
//!
//! One pass per committed move:
//!
//! 1. Collect maximal runs uniform in color and, separately, in shape.
//! 2. A color run and a shape run over the same range merge into one
//!    [`RunAttribute::Both`] run.
//! 3. Overlapping runs are chosen greedily (most points, then leftmost, then
//!    color before shape) so no token is consumed twice.
//! 4. Accepted runs are removed right to left. Tokens that become adjacent are
//!    not rescanned until the next move.

use arrayvec::ArrayVec;

use crate::config::ScoringConfig;
use crate::scoring::{run_points, RunAttribute};
use crate::sequence::{MainSequence, Run};
use crate::types::{TokenKind, MAX_CAPACITY};

/// A run selected for removal together with its points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoredRun {
    pub run: Run,
    pub attribute: RunAttribute,
    pub points: u32,
}

/// Result of one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Removed runs, left to right (indices as they were before removal)
    pub runs: ArrayVec<ScoredRun, MAX_CAPACITY>,
    /// Sum of run points
    pub total: u32,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn removed_tokens(&self) -> usize {
        self.runs.iter().map(|r| r.run.len).sum()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchResolver {
    config: ScoringConfig,
}

impl MatchResolver {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Find the disjoint runs a scan would remove, without mutating the row.
    pub fn find_runs(&self, sequence: &MainSequence) -> ArrayVec<ScoredRun, MAX_CAPACITY> {
        let kinds: ArrayVec<TokenKind, MAX_CAPACITY> = sequence.kinds().collect();
        let min = self.config.min_run.max(1);

        let color_runs = maximal_runs(&kinds, min, |k| k.color.index());
        let shape_runs = maximal_runs(&kinds, min, |k| k.shape.index());

        let mut candidates: ArrayVec<ScoredRun, { 2 * MAX_CAPACITY }> = ArrayVec::new();
        for &run in &color_runs {
            let attribute = if shape_runs.contains(&run) {
                RunAttribute::Both
            } else {
                RunAttribute::Color
            };
            candidates.push(self.score(run, attribute));
        }
        for &run in &shape_runs {
            if !color_runs.contains(&run) {
                candidates.push(self.score(run, RunAttribute::Shape));
            }
        }

        candidates.sort_unstable_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(a.run.start.cmp(&b.run.start))
                .then(attribute_rank(a.attribute).cmp(&attribute_rank(b.attribute)))
        });

        let mut accepted: ArrayVec<ScoredRun, MAX_CAPACITY> = ArrayVec::new();
        for candidate in candidates {
            if accepted.iter().all(|r| !r.run.overlaps(&candidate.run)) {
                accepted.push(candidate);
            }
        }
        accepted.sort_unstable_by_key(|r| r.run.start);
        accepted
    }

    /// Remove every qualifying run and return what was scored.
    pub fn scan(&self, sequence: &mut MainSequence) -> Resolution {
        let runs = self.find_runs(sequence);
        let mut total = 0u32;

        for scored in runs.iter().rev() {
            match sequence.remove_run(scored.run) {
                Ok(removed) => {
                    total = total.saturating_add(scored.points);
                    tracing::trace!(
                        start = scored.run.start,
                        len = removed.len(),
                        points = scored.points,
                        attribute = ?scored.attribute,
                        "run removed"
                    );
                }
                Err(err) => {
                    // Runs come from the same row, so this only fires on a logic error.
                    tracing::warn!(%err, "skipping run");
                }
            }
        }

        Resolution { runs, total }
    }

    fn score(&self, run: Run, attribute: RunAttribute) -> ScoredRun {
        ScoredRun {
            run,
            attribute,
            points: run_points(run.len, attribute, &self.config),
        }
    }
}

fn attribute_rank(attribute: RunAttribute) -> u8 {
    match attribute {
        RunAttribute::Both => 0,
        RunAttribute::Color => 1,
        RunAttribute::Shape => 2,
    }
}

/// Maximal runs of equal `key` with length >= `min`
fn maximal_runs(
    kinds: &[TokenKind],
    min: usize,
    key: impl Fn(TokenKind) -> usize,
) -> ArrayVec<Run, MAX_CAPACITY> {
    let mut runs = ArrayVec::new();
    let mut start = 0;
    while start < kinds.len() {
        let value = key(kinds[start]);
        let mut end = start + 1;
        while end < kinds.len() && key(kinds[end]) == value {
            end += 1;
        }
        if end - start >= min {
            runs.push(Run::new(start, end - start));
        }
        start = end;
    }
    runs
}
