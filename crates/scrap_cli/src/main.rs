use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scrap_core::grouping::ordered_groups;
use scrap_core::selector::select_with_path;
use scrap_core::{
    condition_to_percent, InMemoryQolSettings, Item, ItemId, ItemUid, NoQolSettings, PartsCatalog,
    QolFlag, RepairUi, Resolution, ScrapRepair,
};
use scrap_world::{label_items, load_content, load_inventory, save_inventory, spawn_copies};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "scrap_cli", about = "Scrap-repair consolidation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List part groups and the copies a scrap-repair would consume.
    Groups {
        #[arg(long, default_value = "./content")]
        content_dir: String,
        #[arg(long)]
        inventory: PathBuf,
    },
    /// Propose a scrap-repair, ask for confirmation and apply it.
    Repair {
        #[arg(long, default_value = "./content")]
        content_dir: String,
        #[arg(long)]
        inventory: PathBuf,
        /// UID of the item currently selected in the inventory view.
        #[arg(long)]
        select: Option<ItemUid>,
        /// Confirm without prompting.
        #[arg(long)]
        yes: bool,
        /// Write the result here instead of overwriting --inventory.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Pretend the inventory popup mod is installed with popups enabled.
        #[arg(long)]
        qol_popups: bool,
    },
    /// Append worn copies of a part to an inventory file.
    Spawn {
        #[arg(long)]
        id: String,
        #[arg(long)]
        count: usize,
        /// Seed for conditions and UIDs. Random if omitted.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 0.5)]
        max_condition: f32,
        #[arg(long)]
        inventory: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Terminal collaborators
// ---------------------------------------------------------------------------

struct TerminalUi;

impl RepairUi for TerminalUi {
    fn request_confirmation(&mut self, title: &str, description: &str) {
        println!("== {title} ==");
        println!("{description}");
    }

    fn notify(&mut self, title: &str, message: &str) {
        println!("[{title}] {message}");
    }

    fn notify_no_candidates(&mut self, message: &str) {
        println!("{message}");
    }
}

/// `y`/`yes` confirms; anything else, including EOF, declines.
fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn ask_confirmation(input: &mut impl BufRead) -> Result<bool> {
    print!("Repair? [y/N] ");
    std::io::stdout().flush().context("flushing stdout")?;
    let mut line = String::new();
    input.read_line(&mut line).context("reading answer")?;
    Ok(parse_answer(&line))
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// One summary line per group, each followed by the subset a repair would
/// consume when there is one.
fn group_report(content_dir: &str, inventory_path: &Path) -> Result<Vec<String>> {
    let content = load_content(content_dir)?;
    let mut items = load_inventory(inventory_path)?;
    label_items(&mut items, &content);
    let catalog = &content.parts_info;

    let mut lines = Vec::new();
    for group in ordered_groups(&items, None) {
        let classification = catalog.classification(group.id);
        let min_condition = catalog.min_condition_to_repair(group.id);
        let members: Vec<Item> = group.members.iter().map(|&item| item.clone()).collect();
        let selection = select_with_path(
            &members,
            catalog.max_damage_level(&members[0]),
            classification,
        );

        let conditions: Vec<String> = members
            .iter()
            .map(|item| condition_to_percent(item.condition))
            .collect();
        lines.push(format!(
            "{name:<24} {classification:?} min={min} members={count} [{conditions}]",
            name = members[0].display_name(),
            min = condition_to_percent(min_condition),
            count = members.len(),
            conditions = conditions.join(", "),
        ));
        if selection.items.len() >= 2 {
            let chosen: Vec<String> = selection
                .items
                .iter()
                .map(|item| condition_to_percent(item.condition))
                .collect();
            lines.push(format!(
                "    would combine [{}] -> {} ({:?})",
                chosen.join(", "),
                condition_to_percent(scrap_core::repaired_condition(&selection.items)),
                selection.path,
            ));
        }
    }
    Ok(lines)
}

fn list_groups(content_dir: &str, inventory_path: &Path) -> Result<()> {
    for line in group_report(content_dir, inventory_path)? {
        println!("{line}");
    }
    Ok(())
}

fn repair(
    content_dir: &str,
    inventory_path: &Path,
    select: Option<ItemUid>,
    yes: bool,
    out: Option<&Path>,
    qol_popups: bool,
) -> Result<()> {
    let content = load_content(content_dir)?;
    let mut items = load_inventory(inventory_path)?;
    label_items(&mut items, &content);

    let selection: Option<Item> = match select {
        Some(uid) => match items.iter().find(|item| item.uid == uid) {
            Some(item) => Some(item.clone()),
            None => bail!("no item with uid {uid} in {}", inventory_path.display()),
        },
        None => None,
    };

    let mut ui = TerminalUi;
    let mut session = ScrapRepair::new(&content.parts_info);
    if session.start(&items, &selection, &mut ui).is_err() {
        return Ok(());
    }

    let confirmed = yes || ask_confirmation(&mut std::io::stdin().lock())?;

    let resolution = if qol_popups {
        let mut settings = InMemoryQolSettings::default();
        for flag in QolFlag::ALL {
            settings = settings.with_flag(flag, true);
        }
        session.resolve(confirmed, &mut items, &mut ui, &mut settings)?
    } else {
        session.resolve(confirmed, &mut items, &mut ui, &mut NoQolSettings)?
    };

    match resolution {
        Resolution::Applied(report) => {
            let path = out.unwrap_or(inventory_path);
            save_inventory(path, &items)?;
            tracing::info!(
                target_uid = %report.target,
                consumed = report.consumed.len(),
                missing = report.missing.len(),
                path = %path.display(),
                "inventory saved"
            );
        }
        Resolution::Cancelled => println!("Cancelled."),
        Resolution::TargetMissing(uid) => {
            tracing::warn!(%uid, "target vanished, inventory left unchanged");
        }
    }
    Ok(())
}

fn spawn(
    id: &str,
    count: usize,
    seed: Option<u64>,
    max_condition: f32,
    inventory_path: &Path,
) -> Result<()> {
    let mut items = if inventory_path.exists() {
        load_inventory(inventory_path)?
    } else {
        Vec::new()
    };

    let resolved_seed = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(resolved_seed);
    items.extend(spawn_copies(&mut rng, &ItemId::new(id), count, max_condition));
    save_inventory(inventory_path, &items)?;

    println!(
        "Spawned {count} x {id} (seed={resolved_seed}) into {}",
        inventory_path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Groups {
            content_dir,
            inventory,
        } => list_groups(&content_dir, &inventory)?,
        Commands::Repair {
            content_dir,
            inventory,
            select,
            yes,
            out,
            qol_popups,
        } => repair(
            &content_dir,
            &inventory,
            select,
            yes,
            out.as_deref(),
            qol_popups,
        )?,
        Commands::Spawn {
            id,
            count,
            seed,
            max_condition,
            inventory,
        } => spawn(&id, count, seed, max_condition, &inventory)?,
    }
    Ok(())
}
