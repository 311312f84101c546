use crate::config::RunConfiguration;
use crate::domain::model::{Coord, Item};
use crate::domain::ports::WorldModel;
use std::collections::HashMap;

/// A place a harvested item can go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    PersonalInventory,
    NamedContainer(Coord),
    DefaultContainer(Coord),
    /// Skipped step: bypassed inventory or no chest mapped for the item.
    None,
}

impl Destination {
    /// All-or-nothing: either the whole stack lands here or nothing is touched.
    pub fn try_place<W: WorldModel + ?Sized>(&self, item: &Item, world: &mut W) -> bool {
        match self {
            Destination::PersonalInventory => world.farmer_mut().inventory.try_add(item),
            Destination::NamedContainer(coord) | Destination::DefaultContainer(coord) => world
                .container_at(*coord)
                .is_some_and(|chest| chest.try_add(item)),
            Destination::None => false,
        }
    }
}

/// Decides where harvested items end up.
///
/// Order: inventory (unless bypassed), the chest mapped to the item, the default chest,
/// and finally the inventory again so that bypassing never loses an item while there is
/// still room somewhere.
#[derive(Debug)]
pub struct ItemRouter<'a> {
    bypass_inventory: bool,
    chests: &'a HashMap<u32, Coord>,
    default_chest: Coord,
    storage_exhausted: bool,
}

impl<'a> ItemRouter<'a> {
    pub fn new(config: &'a RunConfiguration) -> Self {
        Self {
            bypass_inventory: config.bypass_inventory,
            chests: &config.chests,
            default_chest: config.default_chest,
            storage_exhausted: false,
        }
    }

    pub fn resolution_order(&self, item: &Item) -> [Destination; 4] {
        let first = if self.bypass_inventory {
            Destination::None
        } else {
            Destination::PersonalInventory
        };
        let named = self
            .chests
            .get(&item.id)
            .map_or(Destination::None, |coord| Destination::NamedContainer(*coord));

        [
            first,
            named,
            Destination::DefaultContainer(self.default_chest),
            Destination::PersonalInventory,
        ]
    }

    /// Returns `true` when the item was stored and must be removed from where it came from.
    pub fn place<W: WorldModel + ?Sized>(&mut self, item: &Item, world: &mut W) -> bool {
        for destination in self.resolution_order(item) {
            if destination.try_place(item, world) {
                tracing::debug!("Stored {} x{} in {:?}", item.name, item.stack, destination);
                return true;
            }
        }

        self.storage_exhausted = true;
        tracing::warn!(
            "Inventory and chests are full, leaving {} x{} where it is",
            item.name,
            item.stack
        );
        false
    }

    /// Sticky for the lifetime of the router, which is one run.
    pub fn storage_exhausted(&self) -> bool {
        self.storage_exhausted
    }
}
