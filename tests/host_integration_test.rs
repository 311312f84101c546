use animal_sitter::adapters::RecordingPresenter;
use animal_sitter::domain::model::{
    Animal, AnimalId, Character, Container, Coord, Farmer, Item, PetKind, Region, TRUFFLE_ID,
};
use animal_sitter::utils::validation::Validate;
use animal_sitter::{
    AnimalSitter, DialogueCatalog, KeyBinding, MemoryWorld, Outcome, Reporter, SitterConfig,
    SitterError, WorldModel,
};
use std::io::Write;
use tempfile::NamedTempFile;

const WORLD: &str = r#"
[farmer]
name = "Alex"
money = 1000
spouse = "Leah"
inventory = { capacity = 12 }

[[animals]]
id = 1
name = "Hamlet"
kind = "Pig"
age = 30
age_when_mature = 10
produce = { id = 430, name = "Truffle" }

[[buildings]]
name = "Coop"
kind = "coop"

[[buildings.animals]]
id = 2
name = "Clucky"
kind = "White Chicken"
age = 1
age_when_mature = 3

[[buildings.objects]]
coord = { x = 3, y = 4 }
item = { id = 176, name = "Egg", category = "egg" }

[[objects]]
coord = { x = 73, y = 14 }
object = { type = "chest", capacity = 36 }

[[objects]]
coord = { x = 70, y = 14 }
object = { type = "chest", capacity = 36 }
"#;

const SETTINGS: &str = r#"
key_bind = "f5"
who_checks = "spouse"
cost_per_action = 2
bypass_inventory = true
chest_defs = "430,70,14|oops|176,71"
"#;

fn temp_file(content: &str) -> anyhow::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn test_files_drive_a_full_run() -> anyhow::Result<()> {
    let settings_file = temp_file(SETTINGS)?;
    let world_file = temp_file(WORLD)?;

    let settings = SitterConfig::from_file(settings_file.path())?;
    settings.validate()?;
    let config = settings.to_run_configuration();
    assert_eq!(config.key_binding, KeyBinding::Function(5));
    assert_eq!(config.chests.len(), 1);

    let mut world = MemoryWorld::from_file(world_file.path())?;
    world.validate()?;

    let mut presenter = RecordingPresenter::new();
    let mut sitter = AnimalSitter::with_seed(config, DialogueCatalog::builtin()?, 3);
    let report = sitter
        .on_key_released(KeyBinding::Function(5), &mut world, &mut presenter)
        .ok_or_else(|| anyhow::anyhow!("the bound key should trigger a run"))?;

    // pig: pet, fed, happiness, friendship, truffle; chick: pet, aged, fed, happiness,
    // friendship; coop floor: egg
    assert_eq!(report.actions, 11);
    assert_eq!(report.stats.truffles_harvested, 1);
    assert_eq!(report.stats.products_harvested, 1);
    assert_eq!(report.outcome, Outcome::PaidInFull);
    assert_eq!(world.farmer.money, 1000 - 22);

    // bypassed inventory: truffle goes to its own chest, the egg to the default one
    assert_eq!(world.farmer.inventory.count_of(TRUFFLE_ID), 0);
    assert_eq!(
        world.chest(Coord::new(70, 14)).map(|c| c.count_of(TRUFFLE_ID)),
        Some(1)
    );
    assert_eq!(world.chest(Coord::new(73, 14)).map(|c| c.count_of(176)), Some(1));
    assert_eq!(world.farmer.experience.farming, 5);
    assert!(world
        .storage_cells(&Region::Building("Coop".to_string()))
        .is_empty());

    let message = report.message.expect("messages are enabled");
    assert!(message.text.starts_with("Leah took care of the animals today"));
    Ok(())
}

#[test]
fn test_saved_world_keeps_the_run() -> anyhow::Result<()> {
    let world_file = temp_file(WORLD)?;
    let mut world = MemoryWorld::from_file(world_file.path())?;
    let mut presenter = RecordingPresenter::new();
    let mut sitter = AnimalSitter::with_seed(
        SitterConfig::default().to_run_configuration(),
        DialogueCatalog::builtin()?,
        3,
    );

    sitter.run(&mut world, &mut presenter);
    world.save(world_file.path())?;

    let reloaded = MemoryWorld::from_file(world_file.path())?;
    assert_eq!(reloaded, world);
    let chick = reloaded.animal(AnimalId(2)).expect("chick is still there");
    assert!(!chick.is_baby());
    assert!(chick.was_pet);
    Ok(())
}

#[test]
fn test_custom_dialogue_catalog_file() -> anyhow::Result<()> {
    let catalog_file = temp_file(
        r#"
[xdialog]
1 = "%spouse did %actions things."
2 = "unused"
3 = " Paid %cost."
4 = "unused"
5 = "unused"
6 = "unused"
7 = "unused"
8 = "unused"

[greeting]
1 = "hi"

[unfinishedmoney]
1 = "broke"

[smalltalk]
1 = "bye"
"#,
    )?;
    let catalog = DialogueCatalog::from_file(catalog_file.path())?;
    catalog.validate()?;

    let mut world = MemoryWorld::from_toml_str(WORLD)?;
    let mut presenter = RecordingPresenter::new();
    let mut config = SitterConfig::default().to_run_configuration();
    config.cost_per_action = 1;
    let mut sitter = AnimalSitter::with_seed(config, catalog, 1);
    let report = sitter.run(&mut world, &mut presenter);

    let text = report.message.map(|m| m.text).unwrap_or_default();
    assert_eq!(text, format!("Leah did {} things. Paid {}.", report.actions, report.actions));
    Ok(())
}

#[test]
fn test_broken_world_file_is_a_data_error() -> anyhow::Result<()> {
    let world_file = temp_file("[farmer]\nname = 3\n")?;
    let err = MemoryWorld::from_file(world_file.path()).expect_err("invalid snapshot");
    assert!(matches!(err, SitterError::TomlParseError(_)));

    let missing = MemoryWorld::from_file("/definitely/not/here.toml").expect_err("no file");
    assert!(matches!(missing, SitterError::IoError(_)));
    Ok(())
}

/// Lists an animal that is gone by the time it is looked up.
struct GhostWorld {
    inner: MemoryWorld,
}

impl WorldModel for GhostWorld {
    fn animal_ids(&self) -> Vec<AnimalId> {
        let mut ids = vec![AnimalId(404)];
        ids.extend(self.inner.animal_ids());
        ids
    }

    fn animal_mut(&mut self, id: AnimalId) -> Option<&mut Animal> {
        self.inner.animal_mut(id)
    }

    fn storage_cells(&self, region: &Region) -> Vec<(Coord, Item)> {
        self.inner.storage_cells(region)
    }

    fn remove_cell(&mut self, region: &Region, coord: Coord) -> Option<Item> {
        self.inner.remove_cell(region, coord)
    }

    fn coop_regions(&self) -> Vec<Region> {
        self.inner.coop_regions()
    }

    fn container_at(&mut self, coord: Coord) -> Option<&mut Container> {
        self.inner.container_at(coord)
    }

    fn character_mut(&mut self, name: &str) -> Option<&mut Character> {
        self.inner.character_mut(name)
    }

    fn farmer(&self) -> &Farmer {
        self.inner.farmer()
    }

    fn farmer_mut(&mut self) -> &mut Farmer {
        self.inner.farmer_mut()
    }
}

#[test]
fn test_missing_animal_does_not_stop_the_run() -> anyhow::Result<()> {
    let mut world = GhostWorld {
        inner: MemoryWorld::new(Farmer::new("Alex", 0, 12))
            .with_animal(Animal::new(1, "Daisy", "White Cow", 5).with_age(10)),
    };
    let mut presenter = RecordingPresenter::new();
    let mut sitter = AnimalSitter::with_seed(
        SitterConfig::default().to_run_configuration(),
        DialogueCatalog::builtin()?,
        9,
    );

    let report = sitter.run(&mut world, &mut presenter);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].animal, AnimalId(404));
    assert_eq!(report.actions, 4);
    assert!(world.inner.animal(AnimalId(1)).is_some_and(|a| a.was_pet));
    Ok(())
}

#[test]
fn test_pet_reporter_uses_pet_line() -> anyhow::Result<()> {
    let mut settings = SitterConfig::default();
    settings.who_checks = "pet".to_string();
    let config = settings.to_run_configuration();
    assert_eq!(config.reporter, Reporter::Pet);

    let mut world = MemoryWorld::from_toml_str(WORLD)?;
    world.farmer.pet = Some(PetKind::Cat);
    let mut presenter = RecordingPresenter::new();
    let mut sitter = AnimalSitter::with_seed(config, DialogueCatalog::builtin()?, 5);
    let report = sitter.run(&mut world, &mut presenter);

    assert_eq!(report.message.map(|m| m.text).as_deref(), Some("Meow.."));
    Ok(())
}

/// One CLI invocation: load the snapshot, run once with the saved counters, save it back.
fn session(path: &std::path::Path, settings: &SitterConfig) -> anyhow::Result<String> {
    let mut world = MemoryWorld::from_file(path)?;
    // animals get hungry again overnight
    for id in world.animal_ids() {
        if let Some(animal) = world.animal_mut(id) {
            animal.fullness = 0;
        }
    }
    let mut presenter = RecordingPresenter::new();
    let mut sitter = AnimalSitter::with_seed(
        settings.to_run_configuration(),
        DialogueCatalog::builtin()?,
        11,
    )
    .with_state(world.sitter_state);

    let report = sitter.run(&mut world, &mut presenter);
    world.sitter_state = sitter.state();
    world.save(path)?;

    Ok(report.message.map(|m| m.text).unwrap_or_default())
}

#[test]
fn test_unpaid_days_add_up_across_sessions() -> anyhow::Result<()> {
    let world_file = temp_file(WORLD)?;
    let settings = SitterConfig {
        cost_per_action: 1000,
        ..SitterConfig::default()
    };

    let first = session(world_file.path(), &settings)?;
    assert!(first.ends_with(" 1 days running now."));

    let second = session(world_file.path(), &settings)?;
    assert!(second.ends_with(" You came up short on the 2000 g. 2 days running now."));

    let saved = MemoryWorld::from_file(world_file.path())?;
    assert_eq!(saved.sitter_state.short_days, 2);
    assert_eq!(saved.sitter_state.runs, 2);
    assert_eq!(saved.farmer.money, 0);
    Ok(())
}
