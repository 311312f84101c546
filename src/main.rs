use animal_sitter::utils::error::ErrorSeverity;
use animal_sitter::utils::{logger, validation::Validate};
use animal_sitter::{
    AnimalSitter, CliConfig, ConsolePresenter, DialogueCatalog, KeyBinding, MemoryWorld,
    Outcome, RunReport, SitterConfig, SitterError, WorldModel,
};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🐾 Starting animal-sitter CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli) {
        let Some(sitter_error) = e.downcast_ref::<SitterError>() else {
            tracing::error!("❌ animal-sitter failed: {:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        };

        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ animal-sitter failed: {:#} (Category: {:?}, Severity: {:?})",
            e,
            sitter_error.category(),
            sitter_error.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", sitter_error.recovery_suggestion());

        eprintln!("❌ {}", sitter_error.user_friendly_message());
        eprintln!("💡 建議: {}", sitter_error.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match sitter_error.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run(cli: &CliConfig) -> anyhow::Result<()> {
    let settings = match &cli.config {
        Some(path) => SitterConfig::from_file(path)
            .with_context(|| format!("loading sitter configuration from {}", path))?,
        None => {
            tracing::info!("No configuration file given, using defaults");
            SitterConfig::default()
        }
    };
    settings.validate()?;

    let mut config = settings.to_run_configuration();
    if let Some(path) = &cli.dialogue {
        config.dialogue_path = Some(PathBuf::from(path));
    }

    let catalog = match &config.dialogue_path {
        Some(path) => DialogueCatalog::from_file(path)
            .with_context(|| format!("loading dialogue catalog from {}", path.display()))?,
        None => DialogueCatalog::builtin()?,
    };
    catalog.validate()?;

    let mut world = MemoryWorld::from_file(&cli.world)
        .with_context(|| format!("loading world snapshot from {}", cli.world))?;
    world.validate()?;
    tracing::info!(
        "📂 Loaded world: {} animals, farmer {} with {}g",
        world.animal_ids().len(),
        world.farmer.name,
        world.farmer.money
    );

    let key = match &cli.key {
        Some(key) => key.parse::<KeyBinding>()?,
        None => config.key_binding,
    };

    if cli.dry_run {
        print_plan(&world, &config, key);
        return Ok(());
    }

    let mut presenter = if cli.json {
        ConsolePresenter::quiet()
    } else {
        ConsolePresenter::new()
    };
    let mut sitter = match cli.seed {
        Some(seed) => AnimalSitter::with_seed(config, catalog, seed),
        None => AnimalSitter::new(config, catalog),
    }
    .with_state(world.sitter_state);

    let Some(report) = sitter.on_key_released(key, &mut world, &mut presenter) else {
        tracing::info!(
            "Key {} is not bound to the animal sitter (expected {})",
            key,
            sitter.config().key_binding
        );
        return Ok(());
    };
    world.sitter_state = sitter.state();
    tracing::info!(
        "📅 Run #{} done, {} unpaid day(s) in a row",
        world.sitter_state.runs,
        world.sitter_state.short_days
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if cli.save {
        world
            .save(&cli.world)
            .with_context(|| format!("saving world snapshot to {}", cli.world))?;
        tracing::info!("💾 World saved to: {}", cli.world);
    }

    Ok(())
}

fn print_plan(world: &MemoryWorld, config: &animal_sitter::RunConfiguration, key: KeyBinding) {
    println!("🔍 Dry run, nothing will change");
    println!("   Key: {} (bound to {})", key, config.key_binding);
    println!("   Animals: {}", world.animal_ids().len());
    println!("   Coops: {}", world.coop_regions().len());
    println!("   Reporter: {:?}", config.reporter);
    println!("   Cost per action: {}g", config.cost_per_action);
    println!("   Farmer funds: {}g", world.farmer.money);
    println!("   Default chest: {}", config.default_chest);
    for (item, coord) in &config.chests {
        println!("   Chest for item {}: {}", item, coord);
    }
}

fn print_summary(report: &RunReport) {
    let stats = &report.stats;
    println!("✅ Animal sitter finished: {} actions", report.actions);
    println!(
        "   Petted {}, aged {}, fed {}, happiness {}, friendship {}",
        stats.animals_pet, stats.aged, stats.fed, stats.max_happiness, stats.max_friendship
    );
    println!(
        "   Collected {} products and {} truffles",
        stats.products_harvested, stats.truffles_harvested
    );
    match report.outcome {
        Outcome::PaidInFull => println!("💰 Paid {}g", report.amount_paid),
        Outcome::Unaffordable => println!(
            "💸 Paid {}g of {}g, {}g short",
            report.amount_paid,
            report.total_cost,
            report.shortfall()
        ),
        Outcome::Free | Outcome::NoWorkDone => {}
    }
    if report.storage_exhausted {
        println!("📦 Some items were left behind: every storage option was full");
    }
    for failure in &report.failures {
        println!("⚠️  Animal {}: {}", failure.animal, failure.reason);
    }
}
