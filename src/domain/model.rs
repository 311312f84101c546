use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_FULLNESS: u8 = u8::MAX;
pub const MAX_HAPPINESS: u8 = u8::MAX;
pub const MAX_FRIENDSHIP: u16 = 1000;
pub const MAX_STACK: u32 = 999;

/// 藏在豬鼻子裡的松露
pub const TRUFFLE_ID: u32 = 430;
/// 雞舍裡的恐龍蛋，不屬於動物產品分類但仍要收
pub const DINOSAUR_EGG_ID: u32 = 107;

const TRUFFLE_ANIMAL_KIND: &str = "Pig";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    #[default]
    Normal,
    Silver,
    Gold,
    Iridium,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Egg,
    Milk,
    AnimalGoods,
    Forage,
    #[default]
    Other,
}

impl ItemCategory {
    pub fn is_animal_product(self) -> bool {
        matches!(
            self,
            ItemCategory::Egg | ItemCategory::Milk | ItemCategory::AnimalGoods
        )
    }
}

fn default_stack() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub category: ItemCategory,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default = "default_stack")]
    pub stack: u32,
}

impl Item {
    pub fn new(id: u32, name: impl Into<String>, category: ItemCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            quality: Quality::Normal,
            stack: 1,
        }
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_stack(mut self, stack: u32) -> Self {
        self.stack = stack;
        self
    }

    pub fn truffle() -> Self {
        Self::new(TRUFFLE_ID, "Truffle", ItemCategory::AnimalGoods)
    }

    pub fn is_truffle(&self) -> bool {
        self.id == TRUFFLE_ID
    }

    pub fn is_animal_product(&self) -> bool {
        self.category.is_animal_product() || self.id == DINOSAUR_EGG_ID
    }

    /// 同一物品、同一品質才能疊在一起
    pub fn stacks_with(&self, other: &Item) -> bool {
        self.id == other.id && self.quality == other.quality
    }
}

/// Produce waiting on an animal until someone collects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Produce {
    pub id: u32,
    pub name: String,
    #[serde(default = "default_produce_category")]
    pub category: ItemCategory,
    #[serde(default)]
    pub quality: Quality,
}

fn default_produce_category() -> ItemCategory {
    ItemCategory::AnimalGoods
}

impl Produce {
    pub fn new(id: u32, name: impl Into<String>, quality: Quality) -> Self {
        Self {
            id,
            name: name.into(),
            category: ItemCategory::AnimalGoods,
            quality,
        }
    }

    pub fn to_item(&self) -> Item {
        Item::new(self.id, self.name.clone(), self.category).with_quality(self.quality)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimalId(pub u64);

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GrowthStage {
    #[default]
    Baby,
    Adult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,
    pub name: String,
    pub kind: String,
    pub age: u32,
    pub age_when_mature: u32,
    #[serde(default)]
    pub fullness: u8,
    #[serde(default)]
    pub happiness: u8,
    #[serde(default)]
    pub friendship: u16,
    #[serde(default)]
    pub produce: Option<Produce>,
    #[serde(default)]
    pub was_pet: bool,
    #[serde(skip)]
    stage: GrowthStage,
}

impl Animal {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        kind: impl Into<String>,
        age_when_mature: u32,
    ) -> Self {
        let mut animal = Self {
            id: AnimalId(id),
            name: name.into(),
            kind: kind.into(),
            age: 0,
            age_when_mature,
            fullness: 0,
            happiness: 0,
            friendship: 0,
            produce: None,
            was_pet: false,
            stage: GrowthStage::Baby,
        };
        animal.refresh();
        animal
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self.refresh();
        self
    }

    pub fn with_produce(mut self, produce: Produce) -> Self {
        self.produce = Some(produce);
        self
    }

    pub fn is_baby(&self) -> bool {
        self.age < self.age_when_mature
    }

    pub fn stage(&self) -> GrowthStage {
        self.stage
    }

    pub fn pet(&mut self) {
        self.was_pet = true;
    }

    /// Ages the animal one day past maturity. Never makes an animal younger.
    pub fn grow_up(&mut self) {
        self.age = self.age.max(self.age_when_mature.saturating_add(1));
        self.refresh();
    }

    /// 重新計算由年齡決定的狀態
    pub fn refresh(&mut self) {
        self.stage = if self.is_baby() {
            GrowthStage::Baby
        } else {
            GrowthStage::Adult
        };
    }

    /// Pigs dig their produce out of the ground instead of handing it over.
    pub fn hides_produce(&self) -> bool {
        self.kind == TRUFFLE_ANIMAL_KIND
    }
}

/// Item slots with a fixed capacity. Used for both chests and the farmer's backpack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub capacity: usize,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Container {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    fn room_for(&self, item: &Item) -> u64 {
        let in_stacks: u64 = self
            .items
            .iter()
            .filter(|existing| existing.stacks_with(item))
            .map(|existing| u64::from(MAX_STACK.saturating_sub(existing.stack)))
            .sum();
        in_stacks + self.free_slots() as u64 * u64::from(MAX_STACK)
    }

    /// Whether the whole stack fits. Partial placement is never attempted.
    pub fn can_accept(&self, item: &Item) -> bool {
        self.room_for(item) >= u64::from(item.stack)
    }

    pub fn try_add(&mut self, item: &Item) -> bool {
        if !self.can_accept(item) {
            return false;
        }

        let mut remaining = item.stack;
        for existing in self.items.iter_mut().filter(|e| e.stacks_with(item)) {
            if remaining == 0 {
                break;
            }
            let moved = remaining.min(MAX_STACK.saturating_sub(existing.stack));
            existing.stack += moved;
            remaining -= moved;
        }

        while remaining > 0 {
            let moved = remaining.min(MAX_STACK);
            self.items.push(item.clone().with_stack(moved));
            remaining -= moved;
        }

        true
    }

    pub fn count_of(&self, id: u32) -> u32 {
        self.items
            .iter()
            .filter(|item| item.id == id)
            .map(|item| item.stack)
            .sum()
    }

    pub fn is_full(&self) -> bool {
        self.free_slots() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetKind {
    Cat,
    Dog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skill {
    Farming,
    Foraging,
}

/// Profession ids as the game numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profession {
    /// Chance of doubling forage.
    Gatherer,
    /// Forage is always iridium quality.
    Botanist,
}

impl Profession {
    pub fn id(self) -> u32 {
        match self {
            Profession::Gatherer => 13,
            Profession::Botanist => 16,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub farming: u32,
    #[serde(default)]
    pub foraging: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farmer {
    pub name: String,
    pub money: u32,
    pub inventory: Container,
    #[serde(default)]
    pub professions: Vec<u32>,
    #[serde(default)]
    pub spouse: Option<String>,
    #[serde(default)]
    pub pet: Option<PetKind>,
    #[serde(default)]
    pub experience: Experience,
}

impl Farmer {
    pub fn new(name: impl Into<String>, money: u32, inventory_capacity: usize) -> Self {
        Self {
            name: name.into(),
            money,
            inventory: Container::new(inventory_capacity),
            professions: Vec::new(),
            spouse: None,
            pet: None,
            experience: Experience::default(),
        }
    }

    pub fn has_profession(&self, profession: Profession) -> bool {
        self.professions.contains(&profession.id())
    }

    pub fn is_married(&self) -> bool {
        self.spouse.is_some()
    }

    /// Takes as much of `amount` as the farmer has and returns what was actually paid.
    pub fn charge(&mut self, amount: u64) -> u64 {
        let paid = u32::try_from(amount).map_or(self.money, |amount| amount.min(self.money));
        self.money -= paid;
        u64::from(paid)
    }

    pub fn gain_experience(&mut self, skill: Skill, amount: u32) {
        let bucket = match skill {
            Skill::Farming => &mut self.experience.farming,
            Skill::Foraging => &mut self.experience.foraging,
        };
        *bucket = bucket.saturating_add(amount);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub pending_dialogue: Vec<String>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pending_dialogue: Vec::new(),
        }
    }

    pub fn push_dialogue(&mut self, text: impl Into<String>) {
        self.pending_dialogue.push(text.into());
    }
}

/// A place whose storage cells can be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Region {
    Farm,
    Building(String),
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Farm => write!(f, "farm"),
            Region::Building(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_up_is_one_way() {
        let mut animal = Animal::new(1, "Clucky", "White Chicken", 3).with_age(1);
        assert!(animal.is_baby());
        assert_eq!(animal.stage(), GrowthStage::Baby);

        animal.grow_up();
        assert_eq!(animal.age, 4);
        assert_eq!(animal.stage(), GrowthStage::Adult);

        let mut old = Animal::new(2, "Bessie", "Brown Cow", 5).with_age(40);
        old.grow_up();
        assert_eq!(old.age, 40);
    }

    #[test]
    fn test_container_merges_stacks_before_using_slots() {
        let mut chest = Container::new(1).with_items(vec![Item::truffle().with_stack(10)]);
        assert!(chest.is_full());
        assert!(chest.try_add(&Item::truffle().with_stack(2)));
        assert_eq!(chest.items.len(), 1);
        assert_eq!(chest.count_of(TRUFFLE_ID), 12);

        // 品質不同不能疊
        let gold = Item::truffle().with_quality(Quality::Gold);
        assert!(!chest.can_accept(&gold));
        assert!(!chest.try_add(&gold));
        assert_eq!(chest.count_of(TRUFFLE_ID), 12);
    }

    #[test]
    fn test_container_rejects_partial_fit() {
        let mut chest = Container::new(1).with_items(vec![Item::truffle().with_stack(MAX_STACK - 1)]);
        let pair = Item::truffle().with_stack(2);
        assert!(!chest.try_add(&pair));
        assert_eq!(chest.count_of(TRUFFLE_ID), MAX_STACK - 1);
    }

    #[test]
    fn test_charge_never_goes_negative() {
        let mut farmer = Farmer::new("Alex", 25, 12);
        assert_eq!(farmer.charge(30), 25);
        assert_eq!(farmer.money, 0);
        assert_eq!(farmer.charge(10), 0);

        let mut rich = Farmer::new("Alex", 50, 12);
        assert_eq!(rich.charge(u64::MAX), 50);
        assert_eq!(rich.money, 0);
    }

    #[test]
    fn test_animal_products() {
        assert!(Item::new(176, "Egg", ItemCategory::Egg).is_animal_product());
        assert!(Item::new(DINOSAUR_EGG_ID, "Dinosaur Egg", ItemCategory::Other).is_animal_product());
        assert!(!Item::new(24, "Parsnip", ItemCategory::Other).is_animal_product());
    }
}
