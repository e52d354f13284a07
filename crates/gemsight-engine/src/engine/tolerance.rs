use crate::{ConfigError, core::Tolerance};

/// Baseline, step and ceiling of the adaptive color tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TolerancePolicy {
    baseline: Tolerance,
    step: Tolerance,
    ceiling: Tolerance,
}

impl TolerancePolicy {
    pub fn new(
        baseline: Tolerance,
        step: Tolerance,
        ceiling: Tolerance,
    ) -> Result<Self, ConfigError> {
        if step.get() == 0 {
            return Err(ConfigError::ZeroToleranceStep);
        }
        if baseline > ceiling {
            return Err(ConfigError::BaselineAboveCeiling { baseline, ceiling });
        }
        Ok(Self {
            baseline,
            step,
            ceiling,
        })
    }

    #[must_use]
    pub fn baseline(&self) -> Tolerance {
        self.baseline
    }

    #[must_use]
    pub fn step(&self) -> Tolerance {
        self.step
    }

    #[must_use]
    pub fn ceiling(&self) -> Tolerance {
        self.ceiling
    }
}

/// Result of [`ToleranceState::escalate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Escalation {
    /// Tolerance went up; the next scan is more permissive.
    Raised { from: Tolerance, to: Tolerance },
    /// Tolerance was already at the ceiling and stays there.
    AtCeiling,
}

/// Current color tolerance of a round.
///
/// Starts at the baseline, climbs by one step per fruitless board scan, never
/// exceeds the ceiling, and drops back to the baseline after every move.
///
/// # Example
///
/// ```
/// use gemsight_engine::{Escalation, Tolerance, TolerancePolicy, ToleranceState};
///
/// let policy =
///     TolerancePolicy::new(Tolerance::new(15), Tolerance::new(5), Tolerance::new(25)).unwrap();
/// let mut state = ToleranceState::new(policy);
///
/// assert!(state.escalate().is_raised());
/// assert!(state.escalate().is_raised());
/// assert_eq!(state.current(), Tolerance::new(25));
/// assert_eq!(state.escalate(), Escalation::AtCeiling);
///
/// state.record_match();
/// assert_eq!(state.current(), Tolerance::new(15));
/// ```
#[derive(Debug, Clone)]
pub struct ToleranceState {
    policy: TolerancePolicy,
    current: Tolerance,
}

impl ToleranceState {
    #[must_use]
    pub fn new(policy: TolerancePolicy) -> Self {
        Self {
            policy,
            current: policy.baseline,
        }
    }

    #[must_use]
    pub fn current(&self) -> Tolerance {
        self.current
    }

    #[must_use]
    pub fn policy(&self) -> &TolerancePolicy {
        &self.policy
    }

    #[must_use]
    pub fn is_at_ceiling(&self) -> bool {
        self.current >= self.policy.ceiling
    }

    /// A move was made: the board changed, so start picky again.
    pub fn record_match(&mut self) {
        self.current = self.policy.baseline;
    }

    /// A full scan found nothing: loosen the tolerance by one step.
    pub fn escalate(&mut self) -> Escalation {
        if self.is_at_ceiling() {
            self.current = self.policy.ceiling;
            return Escalation::AtCeiling;
        }
        let from = self.current;
        self.current = from.raised_by(self.policy.step, self.policy.ceiling);
        Escalation::Raised {
            from,
            to: self.current,
        }
    }
}
