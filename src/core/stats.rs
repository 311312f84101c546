use crate::domain::model::AnimalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What got done during one run. Counters only ever go up while the run lasts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub animals_pet: u32,
    pub aged: u32,
    pub fed: u32,
    pub max_happiness: u32,
    pub max_friendship: u32,
    pub truffles_harvested: u32,
    pub products_harvested: u32,
}

impl RunStatistics {
    pub fn direct_care_count(&self) -> u32 {
        self.animals_pet + self.aged + self.fed + self.max_happiness + self.max_friendship
    }

    pub fn gathered_count(&self) -> u32 {
        self.truffles_harvested + self.products_harvested
    }

    /// Every counted action is billable.
    pub fn task_count(&self) -> u32 {
        self.direct_care_count() + self.gathered_count()
    }

    /// Only collected things, never touched an animal.
    pub fn just_gathering(&self) -> bool {
        self.direct_care_count() == 0 && self.gathered_count() > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PaidInFull,
    Free,
    Unaffordable,
    NoWorkDone,
}

impl Outcome {
    pub fn classify(actions: u32, total_cost: u64, could_afford: bool) -> Self {
        if actions == 0 {
            Outcome::NoWorkDone
        } else if total_cost == 0 {
            Outcome::Free
        } else if could_afford {
            Outcome::PaidInFull
        } else {
            Outcome::Unaffordable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalFailure {
    pub animal: AnimalId,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Ambient,
    Dialogue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchedMessage {
    pub channel: Channel,
    pub speaker: Option<String>,
    pub text: String,
}

/// Everything a run produced, returned to the caller once the run completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stats: RunStatistics,
    pub actions: u32,
    pub total_cost: u64,
    pub amount_paid: u64,
    pub gathering_only: bool,
    pub outcome: Outcome,
    pub storage_exhausted: bool,
    pub failures: Vec<AnimalFailure>,
    pub message: Option<DispatchedMessage>,
}

impl RunReport {
    pub fn shortfall(&self) -> u64 {
        self.total_cost.saturating_sub(self.amount_paid)
    }
}
