//! Command-line front end for the palette store.
//!
//! # Responsibility
//! - Parse subcommands and global configuration.
//! - Open the SQLite-backed store, run one action and print its
//!   notification.

mod api;
mod config;

use api::ActionResponse;
use clap::{Parser, Subcommand};
use config::AppConfig;
use log::info;
use palette_core::db::open_db;
use palette_core::{
    init_logging, Identifier, IdAllocator, LoadOutcome, MergeMode, PaletteStore,
    SectionViewState, SqliteKeyValueStore, SystemClipboard,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "palettes")]
#[command(about = "Manage color palettes stored in a local database", version)]
struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List palettes with their ids
    List,

    /// Show one palette with its sections and colors
    Show {
        palette_id: Identifier,

        /// Section ids to show in full instead of the first five colors
        #[arg(long, value_delimiter = ',')]
        expand: Vec<Identifier>,
    },

    /// Add an empty palette
    Add,

    /// Rename a palette
    Rename { palette_id: Identifier, title: String },

    /// Delete one palette
    Delete {
        palette_id: Identifier,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Delete every palette
    Clear {
        /// Confirm the deletion; it cannot be undone
        #[arg(long)]
        yes: bool,
    },

    /// Export all palettes as a JSON array
    Export {
        /// Output file (default: ./palettes.json)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Export one palette as a JSON object
    ExportPalette {
        palette_id: Identifier,

        /// Output file (default: ./<title>.json)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Import palettes from a JSON file
    Import {
        file: PathBuf,

        /// append merges into the current list; replace discards it
        #[arg(long, short = 'm', default_value = "append")]
        mode: MergeMode,
    },

    /// Section commands
    Section {
        #[command(subcommand)]
        action: SectionCommands,
    },

    /// Color commands
    Color {
        #[command(subcommand)]
        action: ColorCommands,
    },
}

#[derive(Subcommand)]
enum SectionCommands {
    /// Add a placeholder section to a palette
    Add { palette_id: Identifier },

    /// Rename a section; a blank title restores the placeholder
    Rename {
        palette_id: Identifier,
        section_id: Identifier,
        #[arg(default_value = "")]
        title: String,
    },

    /// Delete a section
    Delete {
        palette_id: Identifier,
        section_id: Identifier,
    },
}

#[derive(Subcommand)]
enum ColorCommands {
    /// Add a hex color; a missing `#` is prepended, an omitted value adds #ffffff
    Add {
        palette_id: Identifier,
        section_id: Identifier,
        value: Option<String>,
    },

    /// Copy the color at a zero-based index to the system clipboard
    Copy {
        palette_id: Identifier,
        section_id: Identifier,
        index: usize,
    },

    /// Remove the color at a zero-based index
    Remove {
        palette_id: Identifier,
        section_id: Identifier,
        index: usize,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.config.resolved_log_dir() {
        if let Err(err) = init_logging(cli.config.resolved_log_level(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = cli.config.resolved_db_path();
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{}`: {err}", db_path.display());
            return ExitCode::FAILURE;
        }
    };
    let backend = match SqliteKeyValueStore::try_new(&conn) {
        Ok(backend) => backend,
        Err(err) => {
            eprintln!("failed to prepare storage: {err}");
            return ExitCode::FAILURE;
        }
    };
    let (mut store, outcome) = match PaletteStore::load(
        backend,
        cli.config.resolved_storage_key(),
        IdAllocator::new(),
    ) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("failed to load palettes: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let LoadOutcome::RecoveredFromCorruption { reason } = &outcome {
        eprintln!("stored palettes were unreadable and have been reset to defaults: {reason}");
    }
    info!("event=cli_run module=cli status=start db={}", db_path.display());

    let response = run(&mut store, cli.command);
    if response.ok {
        println!("{}", response.message);
        ExitCode::SUCCESS
    } else {
        eprintln!("{}", response.message);
        ExitCode::FAILURE
    }
}

fn run(store: &mut PaletteStore<SqliteKeyValueStore<'_>>, command: Commands) -> ActionResponse {
    let cwd = Path::new(".");
    let mut view = SectionViewState::new();
    match command {
        Commands::List => printed(api::list_palettes(store)),
        Commands::Show { palette_id, expand } => match store.get(palette_id) {
            Some(palette) => {
                for section_id in expand {
                    if !view.is_expanded(section_id) {
                        view.toggle_expanded(section_id);
                    }
                }
                printed(api::show_palette(palette, &view))
            }
            None => ActionResponse {
                ok: false,
                palette_id: None,
                section_id: None,
                message: format!("palette not found: {palette_id}"),
            },
        },
        Commands::Add => api::add_palette(store),
        Commands::Rename { palette_id, title } => api::rename_palette(store, palette_id, &title),
        Commands::Delete { palette_id, yes } => api::delete_palette(store, palette_id, yes),
        Commands::Clear { yes } => api::delete_all(store, yes),
        Commands::Export { out } => api::export_all(store, out.as_deref(), cwd),
        Commands::ExportPalette { palette_id, out } => {
            api::export_palette(store, palette_id, out.as_deref(), cwd)
        }
        Commands::Import { file, mode } => api::import_file(store, &file, mode),
        Commands::Section { action } => match action {
            SectionCommands::Add { palette_id } => api::add_section(store, &mut view, palette_id),
            SectionCommands::Rename {
                palette_id,
                section_id,
                title,
            } => api::rename_section(store, &mut view, palette_id, section_id, &title),
            SectionCommands::Delete {
                palette_id,
                section_id,
            } => api::delete_section(store, &mut view, palette_id, section_id),
        },
        Commands::Color { action } => match action {
            ColorCommands::Add {
                palette_id,
                section_id,
                value,
            } => api::add_color(store, &mut view, palette_id, section_id, value.as_deref()),
            ColorCommands::Copy {
                palette_id,
                section_id,
                index,
            } => api::copy_color(store, &SystemClipboard, palette_id, section_id, index),
            ColorCommands::Remove {
                palette_id,
                section_id,
                index,
            } => api::remove_color(store, palette_id, section_id, index),
        },
    }
}

fn printed(text: String) -> ActionResponse {
    ActionResponse {
        ok: true,
        palette_id: None,
        section_id: None,
        message: text,
    }
}
