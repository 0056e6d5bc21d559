// Algorithm configuration.
//
// Each long-running algorithm takes its knobs explicitly; there is no
// process-wide setting.

/// Bounds for epsilon-closure weight computation.
///
/// Closure weights are computed by relaxation. Under a semiring without the
/// needed convergence properties an epsilon cycle would relax forever, so the
/// number of relaxations per closure is capped and exceeding it is reported
/// as [`FstError::NonConvergent`](crate::FstError::NonConvergent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpsilonConfig {
    /// Maximum relaxations per closure, as a multiple of the state count.
    pub relaxation_factor: usize,
}

impl Default for EpsilonConfig {
    fn default() -> Self {
        Self {
            relaxation_factor: 64,
        }
    }
}

impl EpsilonConfig {
    /// Relaxation budget for an automaton with `num_states` states.
    pub fn budget(&self, num_states: usize) -> usize {
        self.relaxation_factor.saturating_mul(num_states.max(1))
    }
}

/// Configuration for weighted subset construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeterminizeConfig {
    pub epsilon: EpsilonConfig,
    /// Abort with `CapacityExceeded` once this many subsets exist.
    pub max_states: Option<usize>,
}

/// Configuration for lookup (transduction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LookupConfig {
    /// Abort with `CapacityExceeded` once more result states than this
    /// would be created. `None` means unbounded.
    pub max_states: Option<usize>,
}

impl LookupConfig {
    pub fn capped(max_states: usize) -> Self {
        Self {
            max_states: Some(max_states),
        }
    }
}

/// Bounds for path enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathConfig {
    /// Maximum number of non-epsilon arcs on a path.
    pub max_length: usize,
    /// Stop after this many paths.
    pub max_paths: usize,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            max_length: 32,
            max_paths: 10_000,
        }
    }
}
