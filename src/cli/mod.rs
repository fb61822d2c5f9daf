use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::StorageKind;
use crate::form::{Language, Length, ListingForm, Tone};
use crate::prompt::RewritePreset;
use crate::wire::OutputField;

#[derive(Parser, Debug)]
#[command(name = "listing-copy", version, about = "Generate real estate listing copy with an LLM")]
pub struct Args {
    /// TOML or YAML config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub model: Option<String>,

    #[arg(long, global = true, value_enum)]
    pub storage: Option<StorageKind>,

    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Save every request/response pair under `<data_dir>/tx/`.
    #[arg(long, global = true, default_value_t = false)]
    pub save_exchanges: bool,

    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate all six pieces of copy for a property.
    Generate(FormArgs),
    /// Rewrite one field of a history entry.
    Rewrite {
        #[arg(long, value_enum)]
        field: OutputField,
        /// Free-text instruction, e.g. "Stronger Hook".
        #[arg(long, conflicts_with = "preset", required_unless_present = "preset")]
        instruction: Option<String>,
        #[arg(long, value_enum)]
        preset: Option<RewritePreset>,
        /// History entry to rewrite; defaults to the most recent one.
        #[arg(long)]
        id: Option<String>,
    },
    /// Inspect and manage past generations.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Copy one field of a history entry to the system clipboard.
    Copy {
        id: String,
        #[arg(value_enum)]
        field: OutputField,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    List {
        #[arg(long, default_value_t = false)]
        favorites: bool,
    },
    Show { id: String },
    Favorite { id: String },
    Delete { id: String },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct FormArgs {
    #[arg(long)]
    pub property_type: String,
    #[arg(long)]
    pub highlights: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub price: String,
    #[arg(long, default_value = "")]
    pub beds: String,
    #[arg(long, default_value = "")]
    pub baths: String,
    #[arg(long, default_value = "")]
    pub sqft: String,
    #[arg(long, default_value = "")]
    pub lot_size: String,
    #[arg(long, default_value = "")]
    pub year_built: String,
    #[arg(long, default_value = "")]
    pub parking: String,
    #[arg(long, default_value = "")]
    pub neighborhood: String,
    #[arg(long, value_enum, default_value_t = Tone::Standard)]
    pub tone: Tone,
    #[arg(long, value_enum, default_value_t = Length::Medium)]
    pub length: Length,
    #[arg(long, value_enum, default_value_t = Language::En)]
    pub language: Language,
}

impl From<FormArgs> for ListingForm {
    fn from(a: FormArgs) -> Self {
        ListingForm {
            property_type: a.property_type,
            address: a.address,
            price: a.price,
            beds: a.beds,
            baths: a.baths,
            sqft: a.sqft,
            lot_size: a.lot_size,
            year_built: a.year_built,
            parking: a.parking,
            neighborhood: a.neighborhood,
            highlights: a.highlights,
            tone: a.tone.as_str().into(),
            length: a.length.as_str().into(),
            language: a.language.as_str().into(),
        }
    }
}
