use crate::core::state::SitterState;
use crate::domain::model::{
    Animal, AnimalId, Character, Container, Coord, Farmer, Item, Region, MAX_FRIENDSHIP,
};
use crate::domain::ports::WorldModel;
use crate::utils::error::{Result, SitterError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_unique, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FarmObject {
    Item(Item),
    Chest(Container),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub coord: Coord,
    pub object: FarmObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub coord: Coord,
    pub item: Item,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Coop,
    Barn,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    pub kind: BuildingKind,
    #[serde(default)]
    pub animals: Vec<Animal>,
    #[serde(default)]
    pub objects: Vec<PlacedItem>,
}

impl Building {
    pub fn new(name: impl Into<String>, kind: BuildingKind) -> Self {
        Self {
            name: name.into(),
            kind,
            animals: Vec::new(),
            objects: Vec::new(),
        }
    }

    pub fn with_animal(mut self, animal: Animal) -> Self {
        self.animals.push(animal);
        self
    }

    pub fn with_item(mut self, coord: Coord, item: Item) -> Self {
        self.objects.push(PlacedItem { coord, item });
        self
    }
}

/// A whole farm held in memory, loadable from a TOML snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryWorld {
    pub farmer: Farmer,
    #[serde(default)]
    pub animals: Vec<Animal>,
    #[serde(default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub objects: Vec<PlacedObject>,
    #[serde(default)]
    pub characters: Vec<Character>,
    /// Sitter counters carried from one session to the next.
    #[serde(default)]
    pub sitter_state: SitterState,
}

impl MemoryWorld {
    pub fn new(farmer: Farmer) -> Self {
        Self {
            farmer,
            animals: Vec::new(),
            buildings: Vec::new(),
            objects: Vec::new(),
            characters: Vec::new(),
            sitter_state: SitterState::default(),
        }
    }

    pub fn with_animal(mut self, animal: Animal) -> Self {
        self.animals.push(animal);
        self
    }

    pub fn with_building(mut self, building: Building) -> Self {
        self.buildings.push(building);
        self
    }

    pub fn with_chest(mut self, coord: Coord, chest: Container) -> Self {
        self.objects.push(PlacedObject {
            coord,
            object: FarmObject::Chest(chest),
        });
        self
    }

    pub fn with_item(mut self, coord: Coord, item: Item) -> Self {
        self.objects.push(PlacedObject {
            coord,
            object: FarmObject::Item(item),
        });
        self
    }

    pub fn with_character(mut self, character: Character) -> Self {
        self.characters.push(character);
        self
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut world: MemoryWorld = toml::from_str(content)?;
        // 成長階段不存檔，載入後重新計算
        for animal in world.all_animals_mut() {
            animal.refresh();
        }
        Ok(world)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    fn all_animals(&self) -> impl Iterator<Item = &Animal> {
        self.animals
            .iter()
            .chain(self.buildings.iter().flat_map(|b| b.animals.iter()))
    }

    fn all_animals_mut(&mut self) -> impl Iterator<Item = &mut Animal> {
        self.animals
            .iter_mut()
            .chain(self.buildings.iter_mut().flat_map(|b| b.animals.iter_mut()))
    }

    pub fn animal(&self, id: AnimalId) -> Option<&Animal> {
        self.all_animals().find(|a| a.id == id)
    }

    pub fn chest(&self, coord: Coord) -> Option<&Container> {
        self.objects.iter().find_map(|placed| match &placed.object {
            FarmObject::Chest(chest) if placed.coord == coord => Some(chest),
            _ => None,
        })
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    pub fn building(&self, name: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.name == name)
    }
}

impl WorldModel for MemoryWorld {
    fn animal_ids(&self) -> Vec<AnimalId> {
        self.all_animals().map(|a| a.id).collect()
    }

    fn animal_mut(&mut self, id: AnimalId) -> Option<&mut Animal> {
        self.all_animals_mut().find(|a| a.id == id)
    }

    fn storage_cells(&self, region: &Region) -> Vec<(Coord, Item)> {
        match region {
            Region::Farm => self
                .objects
                .iter()
                .filter_map(|placed| match &placed.object {
                    FarmObject::Item(item) => Some((placed.coord, item.clone())),
                    FarmObject::Chest(_) => None,
                })
                .collect(),
            Region::Building(name) => self
                .building(name)
                .map(|b| b.objects.iter().map(|p| (p.coord, p.item.clone())).collect())
                .unwrap_or_default(),
        }
    }

    fn remove_cell(&mut self, region: &Region, coord: Coord) -> Option<Item> {
        match region {
            Region::Farm => {
                let index = self.objects.iter().position(|placed| {
                    placed.coord == coord && matches!(placed.object, FarmObject::Item(_))
                })?;
                match self.objects.remove(index).object {
                    FarmObject::Item(item) => Some(item),
                    FarmObject::Chest(_) => None,
                }
            }
            Region::Building(name) => {
                let building = self.buildings.iter_mut().find(|b| &b.name == name)?;
                let index = building.objects.iter().position(|p| p.coord == coord)?;
                Some(building.objects.remove(index).item)
            }
        }
    }

    fn coop_regions(&self) -> Vec<Region> {
        self.buildings
            .iter()
            .filter(|b| b.kind == BuildingKind::Coop)
            .map(|b| Region::Building(b.name.clone()))
            .collect()
    }

    fn container_at(&mut self, coord: Coord) -> Option<&mut Container> {
        self.objects
            .iter_mut()
            .find(|placed| placed.coord == coord)
            .and_then(|placed| match &mut placed.object {
                FarmObject::Chest(chest) => Some(chest),
                FarmObject::Item(_) => None,
            })
    }

    fn character_mut(&mut self, name: &str) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.name == name)
    }

    fn farmer(&self) -> &Farmer {
        &self.farmer
    }

    fn farmer_mut(&mut self) -> &mut Farmer {
        &mut self.farmer
    }
}

impl Validate for MemoryWorld {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("farmer.name", &self.farmer.name)?;
        validate_positive_number("farmer.inventory.capacity", self.farmer.inventory.capacity, 1)?;

        validate_unique("animals.id", self.all_animals().map(|a| a.id))?;
        for animal in self.all_animals() {
            validate_range(
                &format!("animals.{}.friendship", animal.id),
                animal.friendship,
                0,
                MAX_FRIENDSHIP,
            )?;
        }

        validate_unique("buildings.name", self.buildings.iter().map(|b| b.name.as_str()))?;
        validate_unique("objects.coord", self.objects.iter().map(|p| p.coord))?;
        for placed in &self.objects {
            if let FarmObject::Chest(chest) = &placed.object {
                validate_positive_number(
                    &format!("objects.{}.capacity", placed.coord),
                    chest.capacity,
                    1,
                )?;
            }
        }

        for character in &self.characters {
            validate_non_empty_string("characters.name", &character.name)?;
        }

        if self.farmer.professions.iter().any(|p| *p > 29) {
            return Err(SitterError::InvalidConfigValueError {
                field: "farmer.professions".to_string(),
                value: format!("{:?}", self.farmer.professions),
                reason: "profession ids run from 0 to 29".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GrowthStage, ItemCategory, Produce, Quality, TRUFFLE_ID};

    const SNAPSHOT: &str = r#"
[farmer]
name = "Alex"
money = 500
professions = [13]
spouse = "Leah"
pet = "cat"
inventory = { capacity = 12 }

[[animals]]
id = 1
name = "Hamlet"
kind = "Pig"
age = 2
age_when_mature = 10
produce = { id = 430, name = "Truffle", quality = "gold" }

[[buildings]]
name = "Coop"
kind = "coop"

[[buildings.animals]]
id = 2
name = "Clucky"
kind = "White Chicken"
age = 20
age_when_mature = 3

[[buildings.objects]]
coord = { x = 3, y = 4 }
item = { id = 176, name = "Egg", category = "egg" }

[[objects]]
coord = { x = 73, y = 14 }
object = { type = "chest", capacity = 36 }

[[objects]]
coord = { x = 10, y = 12 }
object = { type = "item", id = 430, name = "Truffle" }

[[characters]]
name = "Shane"
"#;

    #[test]
    fn test_load_snapshot() {
        let world = MemoryWorld::from_toml_str(SNAPSHOT).unwrap();
        assert!(world.validate().is_ok());
        assert_eq!(world.animal_ids(), vec![AnimalId(1), AnimalId(2)]);
        assert_eq!(world.sitter_state, SitterState::default());

        let pig = world.animal(AnimalId(1)).unwrap();
        assert_eq!(pig.stage(), GrowthStage::Baby);
        assert_eq!(pig.produce, Some(Produce::new(430, "Truffle", Quality::Gold)));
        assert_eq!(world.animal(AnimalId(2)).unwrap().stage(), GrowthStage::Adult);

        assert!(world.chest(Coord::new(73, 14)).is_some());
        assert_eq!(world.coop_regions(), vec![Region::Building("Coop".to_string())]);
        assert_eq!(world.storage_cells(&Region::Farm).len(), 1);
    }

    #[test]
    fn test_snapshot_round_trip_keeps_world() {
        let world = MemoryWorld::from_toml_str(SNAPSHOT).unwrap();
        let text = world.to_toml_string().unwrap();
        let reloaded = MemoryWorld::from_toml_str(&text).unwrap();
        assert_eq!(reloaded, world);
    }

    #[test]
    fn test_sitter_state_is_read_from_snapshot() {
        let text = format!("{}\n[sitter_state]\nshort_days = 3\n", SNAPSHOT);
        let world = MemoryWorld::from_toml_str(&text).unwrap();
        assert_eq!(world.sitter_state.short_days, 3);
        assert_eq!(world.sitter_state.runs, 0);
    }

    #[test]
    fn test_container_at_ignores_plain_items() {
        let mut world = MemoryWorld::from_toml_str(SNAPSHOT).unwrap();
        assert!(world.container_at(Coord::new(73, 14)).is_some());
        assert!(world.container_at(Coord::new(10, 12)).is_none());
        assert!(world.container_at(Coord::new(0, 0)).is_none());
    }

    #[test]
    fn test_remove_cell() {
        let mut world = MemoryWorld::from_toml_str(SNAPSHOT).unwrap();
        let coop = Region::Building("Coop".to_string());

        let egg = world.remove_cell(&coop, Coord::new(3, 4)).unwrap();
        assert_eq!(egg.category, ItemCategory::Egg);
        assert!(world.storage_cells(&coop).is_empty());

        // 箱子不算儲存格
        assert!(world.remove_cell(&Region::Farm, Coord::new(73, 14)).is_none());
        assert_eq!(
            world.remove_cell(&Region::Farm, Coord::new(10, 12)).map(|i| i.id),
            Some(TRUFFLE_ID)
        );
    }

    #[test]
    fn test_validation_rejects_duplicate_animals() {
        let world = MemoryWorld::new(Farmer::new("Alex", 0, 12))
            .with_animal(Animal::new(1, "A", "Duck", 5))
            .with_building(
                Building::new("Barn", BuildingKind::Barn).with_animal(Animal::new(1, "B", "Goat", 5)),
            );
        assert!(world.validate().is_err());
    }
}
