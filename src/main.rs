mod cli;

use anyhow::{anyhow, bail, Result};
use bibclip::bibtex::{self, extract_url, filter_by_keywords, format_reference, sort_entries};
use bibclip::clipboard::SystemClipboard;
use bibclip::config::Config;
use bibclip::document::{self, HtmlDocument, Lookup};
use bibclip::notify::{self, NotificationStyle};
use bibclip::utils::unicode::{display_width, pad_to_width, truncate_to_width};
use bibclip::{CopyHandler, CopyOutcome, ErrorPolicy};
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

const KEY_COLUMN_MAX: usize = 28;
const REFERENCE_COLUMN_MAX: usize = 90;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Copy {
            id,
            source,
            modal,
            silent,
            quiet,
        } => {
            handle_copy(&config, &id, source, modal, silent, quiet).await?;
        }
        Commands::Show { id, source } => {
            handle_show(&config, &id, source)?;
        }
        Commands::List {
            source,
            keywords,
            json,
        } => {
            handle_list(&config, source, &keywords, json)?;
        }
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();
}

fn resolve_source(config: &Config, source: Option<PathBuf>) -> Result<PathBuf> {
    source.or_else(|| config.source_path()).ok_or_else(|| {
        anyhow!("No document given: pass --source or set `source` in the config file")
    })
}

async fn handle_copy(
    config: &Config,
    id: &str,
    source: Option<PathBuf>,
    modal: bool,
    silent: bool,
    quiet: bool,
) -> Result<()> {
    let path = resolve_source(config, source)?;
    let document = document::open(&path, config.exclude_fields.as_slice())?;

    let style = if modal {
        NotificationStyle::Modal
    } else {
        config.notification
    };
    let on_error = if silent {
        ErrorPolicy::Silent
    } else {
        config.on_error
    };

    let handler = CopyHandler::new(document, SystemClipboard, notify::from_style(style, quiet))
        .with_error_policy(on_error);

    match handler.copy_to_clipboard(id).await? {
        CopyOutcome::Copied => debug!(id, "copy finished"),
        CopyOutcome::Dropped => debug!(id, "copy dropped"),
    }

    Ok(())
}

fn handle_show(config: &Config, id: &str, source: Option<PathBuf>) -> Result<()> {
    let path = resolve_source(config, source)?;
    let document = document::open(&path, config.exclude_fields.as_slice())?;

    match document.lookup(id) {
        Lookup::Found(text) => {
            println!("{}", text);
            Ok(())
        }
        Lookup::NotFound => Err(anyhow!("No element with id '{}' in {}", id, path.display())),
    }
}

#[derive(Debug, Serialize)]
struct ListedEntry {
    key: String,
    entry_type: String,
    year: Option<i32>,
    reference: String,
    url: Option<String>,
    keywords: Vec<String>,
}

fn handle_list(
    config: &Config,
    source: Option<PathBuf>,
    keywords: &[String],
    json: bool,
) -> Result<()> {
    let path = resolve_source(config, source)?;

    if document::is_html(&path) {
        if !keywords.is_empty() {
            bail!(
                "--keyword filters BibTeX entries; {} is an HTML page",
                path.display()
            );
        }
        return list_html_ids(&path, json);
    }

    let db = bibtex::load_bibtex(&path)?;
    let mut entries = filter_by_keywords(&db.entries, keywords);
    sort_entries(&mut entries);

    if json {
        let listed: Vec<ListedEntry> = entries
            .iter()
            .map(|entry| ListedEntry {
                key: entry.key.clone(),
                entry_type: entry.entry_type.clone(),
                year: entry.year(),
                reference: format_reference(entry),
                url: extract_url(entry),
                keywords: bibtex::extract_keywords(entry),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No matching entries.");
        return Ok(());
    }

    let key_width = entries
        .iter()
        .map(|e| display_width(&truncate_to_width(&e.key, KEY_COLUMN_MAX)))
        .max()
        .unwrap_or(0);

    for entry in &entries {
        println!(
            "{}  {}",
            pad_to_width(&truncate_to_width(&entry.key, KEY_COLUMN_MAX), key_width),
            truncate_to_width(&format_reference(entry), REFERENCE_COLUMN_MAX)
        );
    }
    println!("\n{} entries", entries.len());

    Ok(())
}

fn list_html_ids(path: &Path, json: bool) -> Result<()> {
    let document = HtmlDocument::load(path)?;
    let ids = document.ids();

    if json {
        println!("{}", serde_json::to_string_pretty(&ids)?);
    } else {
        for id in &ids {
            println!("{}", id);
        }
    }

    Ok(())
}
