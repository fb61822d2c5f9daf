use anyhow::{anyhow, Context};
use clap::Parser;
use std::time::Instant;

use listing_copy::cli::{self, Command, HistoryAction};
use listing_copy::clipboard::{self, ArboardClipboard, CopyIndicator};
use listing_copy::config::Config;
use listing_copy::form::ListingForm;
use listing_copy::history::{HistoryStore, RemoveOutcome};
use listing_copy::provider;
use listing_copy::session::Session;
use listing_copy::storage::{self, DynStore};
use listing_copy::{log, ux};

fn load_config(args: &cli::Args) -> anyhow::Result<Config> {
    let mut cfg = Config::load(args.config.as_deref()).context("loading config")?;
    if let Some(model) = &args.model {
        cfg.model = model.clone();
    }
    if let Some(kind) = args.storage {
        cfg.storage = kind;
    }
    if let Some(dir) = &args.data_dir {
        cfg.data_dir = dir.clone();
    }
    cfg.save_exchanges |= args.save_exchanges;
    Ok(cfg)
}

fn open_history(cfg: &Config) -> anyhow::Result<HistoryStore<DynStore>> {
    let store = storage::open_store(cfg).context("opening history storage")?;
    Ok(HistoryStore::load(store))
}

async fn generate(cfg: &Config, form: ListingForm) -> anyhow::Result<()> {
    let client = provider::make_client(cfg)?;
    let session = Session::new(client, open_history(cfg)?);
    session.set_form(form);

    let pb = ux::spinner("Generating listing copy...");
    let result = session.submit().await;
    pb.finish_and_clear();

    match result {
        Ok(outputs) => {
            ux::print_outputs(&outputs);
            if let Some(id) = session.selected_id() {
                println!("saved as {id}");
            }
            Ok(())
        }
        Err(e) => Err(anyhow!(session.error().unwrap_or_else(|| e.to_string()))),
    }
}

async fn rewrite(
    cfg: &Config,
    field: listing_copy::wire::OutputField,
    instruction: String,
    id: Option<String>,
) -> anyhow::Result<()> {
    let history = open_history(cfg)?;
    let id = match id.or_else(|| history.entries().first().map(|e| e.id.clone())) {
        Some(id) => id,
        None => return Err(anyhow!("history is empty; generate something first")),
    };

    let client = provider::make_client(cfg)?;
    let session = Session::new(client, history);
    if !session.select_history(&id)? {
        return Err(anyhow!("no history entry with id {id}"));
    }

    let pb = ux::spinner(&format!("Rewriting {}...", field.as_str()));
    let result = session.rewrite(field, &instruction).await;
    pb.finish_and_clear();

    match result {
        Ok(text) => {
            ux::print_field(field, &text);
            Ok(())
        }
        Err(e) => Err(anyhow!(session.error().unwrap_or_else(|| e.to_string()))),
    }
}

fn history(cfg: &Config, action: HistoryAction) -> anyhow::Result<()> {
    let mut history = open_history(cfg)?;
    match action {
        HistoryAction::List { favorites } => {
            let entries: Vec<_> = if favorites {
                history.favorites().collect()
            } else {
                history.entries().iter().collect()
            };
            ux::print_history(&entries);
        }
        HistoryAction::Show { id } => {
            let entry = history.select(&id).ok_or_else(|| anyhow!("no history entry with id {id}"))?;
            ux::print_entry(entry);
        }
        HistoryAction::Favorite { id } => {
            if !history.toggle_favorite(&id) {
                return Err(anyhow!("no history entry with id {id}"));
            }
            let fav = history.log().get(&id).map(|e| e.favorite).unwrap_or_default();
            println!("{id} {}", if fav { "added to favorites" } else { "removed from favorites" });
        }
        HistoryAction::Delete { id } => match history.remove(&id) {
            RemoveOutcome::NotFound => return Err(anyhow!("no history entry with id {id}")),
            _ => println!("deleted {id}"),
        },
    }
    Ok(())
}

fn copy(cfg: &Config, id: &str, field: listing_copy::wire::OutputField) -> anyhow::Result<()> {
    let mut history = open_history(cfg)?;
    let entry = history.select(id).ok_or_else(|| anyhow!("no history entry with id {id}"))?;
    let mut clip = ArboardClipboard::new()?;
    let mut indicator = CopyIndicator::new();
    clipboard::copy_field(&mut clip, &mut indicator, &entry.outputs, field)?;
    if indicator.is_active(field, Instant::now()) {
        println!("Copied {} to clipboard", field.as_str());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    log::init_tracing(args.debug);

    let cfg = load_config(&args)?;
    tracing::debug!(?cfg.storage, data_dir = %cfg.data_dir, model = %cfg.model, "config loaded");

    let result = match args.command {
        Command::Generate(form) => generate(&cfg, form.into()).await,
        Command::Rewrite { field, instruction, preset, id } => {
            let instruction = instruction
                .or_else(|| preset.map(|p| p.instruction().to_string()))
                .unwrap_or_default();
            rewrite(&cfg, field, instruction, id).await
        }
        Command::History { action } => history(&cfg, action),
        Command::Copy { id, field } => copy(&cfg, &id, field),
    };

    if let Err(e) = &result {
        ux::print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
    Ok(())
}
