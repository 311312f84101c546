use crate::config::{KeyBinding, RunConfiguration};
use crate::core::dialogue::DialogueCatalog;
use crate::core::harvest::{harvest_coops, harvest_truffles};
use crate::core::messages::{dispatch, select, MessageContext};
use crate::core::router::ItemRouter;
use crate::core::state::SitterState;
use crate::core::stats::{AnimalFailure, Outcome, RunReport, RunStatistics};
use crate::domain::model::{AnimalId, MAX_FRIENDSHIP, MAX_FULLNESS, MAX_HAPPINESS};
use crate::domain::ports::{Presenter, WorldModel};
use crate::utils::error::{Result, SitterError};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Visits every animal, collects what they produced and bills the farmer for it.
///
/// `run` needs `&mut self`, so two runs can never overlap on the same sitter.
pub struct AnimalSitter<R = StdRng> {
    config: RunConfiguration,
    catalog: DialogueCatalog,
    state: SitterState,
    rng: R,
}

impl AnimalSitter<StdRng> {
    pub fn new(config: RunConfiguration, catalog: DialogueCatalog) -> Self {
        Self::with_rng(config, catalog, StdRng::from_os_rng())
    }

    pub fn with_seed(config: RunConfiguration, catalog: DialogueCatalog, seed: u64) -> Self {
        Self::with_rng(config, catalog, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> AnimalSitter<R> {
    pub fn with_rng(config: RunConfiguration, catalog: DialogueCatalog, rng: R) -> Self {
        Self {
            config,
            catalog,
            state: SitterState::default(),
            rng,
        }
    }

    /// Picks up counters saved by the host from an earlier session.
    pub fn with_state(mut self, state: SitterState) -> Self {
        self.state = state;
        self
    }

    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    pub fn state(&self) -> SitterState {
        self.state
    }

    /// Runs the sitter when the configured key is released; any other key is ignored.
    pub fn on_key_released<W, P>(
        &mut self,
        key: KeyBinding,
        world: &mut W,
        presenter: &mut P,
    ) -> Option<RunReport>
    where
        W: WorldModel + ?Sized,
        P: Presenter + ?Sized,
    {
        if key != self.config.key_binding {
            return None;
        }
        Some(self.run(world, presenter))
    }

    pub fn run<W, P>(&mut self, world: &mut W, presenter: &mut P) -> RunReport
    where
        W: WorldModel + ?Sized,
        P: Presenter + ?Sized,
    {
        let started_at = Utc::now();
        let mut stats = RunStatistics::default();
        let mut failures = Vec::new();
        let mut router = ItemRouter::new(&self.config);

        for id in world.animal_ids() {
            if let Err(e) = visit_animal(id, world, &self.config, &mut router, &mut stats) {
                tracing::error!("Exception visiting animal {}: {}", id, e);
                failures.push(AnimalFailure {
                    animal: id,
                    reason: e.to_string(),
                });
            }
        }

        harvest_truffles(
            world,
            &mut router,
            &mut stats,
            &self.config.reporter,
            &mut self.rng,
        );
        harvest_coops(world, &mut router, &mut stats);

        let actions = stats.task_count();
        let total_cost = u64::from(actions) * u64::from(self.config.cost_per_action);
        let could_afford = u64::from(world.farmer().money) >= total_cost;
        let amount_paid = world.farmer_mut().charge(total_cost);
        let outcome = Outcome::classify(actions, total_cost, could_afford);
        self.state.record(outcome);

        if actions > 0 {
            tracing::info!(
                "🐄 Animal sitter performed {} actions. Total cost: {}g (paid {}g)",
                actions,
                total_cost,
                amount_paid
            );
        } else {
            tracing::info!("There's nothing to do for the animals right now.");
        }
        if outcome == Outcome::Unaffordable {
            tracing::info!(
                "💸 Farmer came up {}g short, {} day(s) in a row",
                total_cost.saturating_sub(amount_paid),
                self.state.short_days
            );
        }

        let mut report = RunReport {
            started_at,
            finished_at: started_at,
            stats,
            actions,
            total_cost,
            amount_paid,
            gathering_only: stats.just_gathering(),
            outcome,
            storage_exhausted: router.storage_exhausted(),
            failures,
            message: None,
        };

        if self.config.messages_enabled {
            let context =
                MessageContext::gather(world, &self.config, &report, self.state.short_days);
            let message = select(&context, &self.catalog, &mut self.rng);
            dispatch(&message, world, presenter);
            report.message = Some(message);
        }

        report.finished_at = Utc::now();
        report
    }
}

/// Applies every enabled chore to one animal. Errors only concern this animal.
fn visit_animal<W: WorldModel + ?Sized>(
    id: AnimalId,
    world: &mut W,
    config: &RunConfiguration,
    router: &mut ItemRouter<'_>,
    stats: &mut RunStatistics,
) -> Result<()> {
    let toggles = config.toggles;
    let animal = world
        .animal_mut(id)
        .ok_or(SitterError::AnimalNotFound { id: id.0 })?;

    if toggles.petting && !animal.was_pet {
        animal.pet();
        stats.animals_pet += 1;
        tracing::trace!("Petting animal: {}", animal.name);
    }

    if toggles.grow_up && animal.is_baby() {
        tracing::trace!("Aging animal to mature+1 days: {}", animal.name);
        animal.grow_up();
        stats.aged += 1;
    }

    if toggles.max_fullness && animal.fullness < MAX_FULLNESS {
        tracing::trace!("Feeding animal: {}", animal.name);
        animal.fullness = MAX_FULLNESS;
        stats.fed += 1;
    }

    if toggles.max_happiness && animal.happiness < MAX_HAPPINESS {
        tracing::trace!("Maxing Happiness of animal {}", animal.name);
        animal.happiness = MAX_HAPPINESS;
        stats.max_happiness += 1;
    }

    if toggles.max_friendship && animal.friendship < MAX_FRIENDSHIP {
        tracing::trace!("Maxing Friendship of animal {}", animal.name);
        animal.friendship = MAX_FRIENDSHIP;
        stats.max_friendship += 1;
    }

    if !toggles.harvest {
        return Ok(());
    }
    let Some(produce) = animal.produce.clone() else {
        return Ok(());
    };

    if produce.id == 0 {
        return Err(SitterError::AnimalStateError {
            name: animal.name.clone(),
            reason: "pending produce has no item id".to_string(),
        });
    }

    tracing::trace!("Has produce: {} {}", animal.name, produce.name);
    let hidden = animal.hides_produce();
    if hidden && !config.take_truffles_from_pigs {
        tracing::trace!("Leaving the truffle with {}", animal.name);
        return Ok(());
    }

    if !router.place(&produce.to_item(), world) {
        tracing::trace!("Inventory full, could not add animal product.");
        return Ok(());
    }

    if let Some(animal) = world.animal_mut(id) {
        animal.produce = None;
    }
    if hidden {
        stats.truffles_harvested += 1;
    } else {
        stats.products_harvested += 1;
    }

    Ok(())
}
