use crate::core::stats::Outcome;
use serde::{Deserialize, Serialize};

/// Counters that outlive a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitterState {
    /// Consecutive runs the farmer could not pay for.
    pub short_days: u32,
    pub runs: u64,
}

impl SitterState {
    pub fn record(&mut self, outcome: Outcome) {
        self.runs += 1;
        match outcome {
            Outcome::Unaffordable => self.short_days += 1,
            Outcome::PaidInFull => self.short_days = 0,
            Outcome::Free | Outcome::NoWorkDone => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_days_reset_on_payment() {
        let mut state = SitterState::default();
        state.record(Outcome::Unaffordable);
        state.record(Outcome::NoWorkDone);
        state.record(Outcome::Unaffordable);
        assert_eq!(state.short_days, 2);

        state.record(Outcome::PaidInFull);
        assert_eq!(state.short_days, 0);
        assert_eq!(state.runs, 4);
    }
}
