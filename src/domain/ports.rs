use crate::domain::model::{Animal, AnimalId, Character, Container, Coord, Farmer, Item, Region};

/// The world the sitter works in. The sitter never creates or destroys animals,
/// it only mutates the ones it is handed.
pub trait WorldModel {
    /// Free-roaming animals followed by the ones housed in buildings.
    fn animal_ids(&self) -> Vec<AnimalId>;

    fn animal_mut(&mut self, id: AnimalId) -> Option<&mut Animal>;

    fn storage_cells(&self, region: &Region) -> Vec<(Coord, Item)>;

    fn remove_cell(&mut self, region: &Region, coord: Coord) -> Option<Item>;

    /// Interiors of every coop on the farm.
    fn coop_regions(&self) -> Vec<Region>;

    /// The chest standing at `coord` on the farm. Anything that is not a chest yields `None`.
    fn container_at(&mut self, coord: Coord) -> Option<&mut Container>;

    fn character_mut(&mut self, name: &str) -> Option<&mut Character>;

    fn farmer(&self) -> &Farmer;

    fn farmer_mut(&mut self) -> &mut Farmer;
}

/// Fire-and-forget presentation channels.
pub trait Presenter {
    fn show_ambient_message(&mut self, text: &str);

    fn show_character_dialogue(&mut self, character: &Character, text: &str);
}
