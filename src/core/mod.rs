pub mod dialogue;
pub mod harvest;
pub mod messages;
pub mod router;
pub mod sitter;
pub mod state;
pub mod stats;

pub use crate::domain::model::{Animal, AnimalId, Container, Coord, Farmer, Item};
pub use crate::domain::ports::{Presenter, WorldModel};
pub use crate::utils::error::Result;
