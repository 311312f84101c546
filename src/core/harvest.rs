use crate::config::Reporter;
use crate::core::router::ItemRouter;
use crate::core::stats::RunStatistics;
use crate::domain::model::{Profession, Quality, Region, Skill};
use crate::domain::ports::WorldModel;
use rand::Rng;

const TRUFFLE_EXPERIENCE: u32 = 7;
const COOP_EXPERIENCE: u32 = 5;

/// Pets are better at sniffing out truffles than people are.
pub fn double_harvest_chance(reporter: &Reporter) -> f64 {
    match reporter {
        Reporter::Pet => 0.4,
        _ => 0.2,
    }
}

/// Picks up truffles the pigs left lying around the farm.
pub fn harvest_truffles<W, R>(
    world: &mut W,
    router: &mut ItemRouter<'_>,
    stats: &mut RunStatistics,
    reporter: &Reporter,
    rng: &mut R,
) where
    W: WorldModel + ?Sized,
    R: Rng,
{
    for (coord, mut item) in world.storage_cells(&Region::Farm) {
        if !item.is_truffle() {
            continue;
        }

        let farmer = world.farmer();
        if farmer.has_profession(Profession::Botanist) {
            item.quality = Quality::Iridium;
        }

        let roll: f64 = rng.random();
        let doubled =
            farmer.has_profession(Profession::Gatherer) && roll < double_harvest_chance(reporter);
        if doubled {
            item.stack = 2;
        }

        if !router.place(&item, world) {
            tracing::trace!("Inventory full, could not add animal product.");
            continue;
        }

        world.remove_cell(&Region::Farm, coord);
        let farmer = world.farmer_mut();
        farmer.gain_experience(Skill::Foraging, TRUFFLE_EXPERIENCE);
        stats.truffles_harvested += 1;

        if doubled {
            farmer.gain_experience(Skill::Foraging, TRUFFLE_EXPERIENCE);
            stats.truffles_harvested += 1;
        }
    }
}

/// Collects eggs and other animal products sitting on coop floors.
pub fn harvest_coops<W>(world: &mut W, router: &mut ItemRouter<'_>, stats: &mut RunStatistics)
where
    W: WorldModel + ?Sized,
{
    for region in world.coop_regions() {
        for (coord, item) in world.storage_cells(&region) {
            tracing::trace!(
                "Found coop object: {} / {:?}/{}",
                item.name,
                item.category,
                item.is_animal_product()
            );

            if !item.is_animal_product() {
                continue;
            }

            if router.place(&item, world) {
                world.remove_cell(&region, coord);
                stats.products_harvested += 1;
                world
                    .farmer_mut()
                    .gain_experience(Skill::Farming, COOP_EXPERIENCE);
            } else {
                tracing::trace!("Inventory full, could not add animal product.");
            }
        }
    }
}
