pub mod anki;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;
pub mod sync;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::anki::AnkiClient;
use crate::cli::{Cli, Command};
use crate::error::SyncError;
use crate::sync::Connector;
use panda_core::SyncAnalysis;

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut settings = config::load(cli.settings.as_deref())?;
    cli.apply_overrides(&mut settings);

    let client = AnkiClient::new(&settings)?;
    tracing::debug!(url = client.url(), "using AnkiConnect endpoint");
    let mut connector = Connector::new(client, settings);

    match &cli.command {
        Command::Extract { note } => {
            let note = cli.read_note(note)?;
            let cards = connector.extract(&note);
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        Command::Check => {
            if !connector.test_connection().await {
                return Err(SyncError::NotConnected.into());
            }
            println!("Connected to AnkiConnect at {}", connector.store().url());
        }
        Command::Analyze { note } => {
            let note = cli.read_note(note)?;
            let cards = connector.extract(&note);
            let target = connector.target_for(&note);
            let analysis = connector.analyze(&cards, &target).await?;
            print_analysis(&target.deck_name, &analysis);
        }
        Command::Sync { note, delete } => {
            let note = cli.read_note(note)?;
            let cards = connector.extract(&note);
            let target = connector.target_for(&note);
            let analysis = connector.analyze(&cards, &target).await?;
            print_analysis(&target.deck_name, &analysis);

            let outcomes = connector.apply(&cards, &target, &analysis, *delete).await?;
            for outcome in &outcomes {
                println!("{outcome}");
            }

            if !*delete && !analysis.to_delete.is_empty() {
                println!(
                    "{} cards no longer in the note were kept (pass --delete to remove them)",
                    analysis.to_delete.len()
                );
            }

            let failures = outcomes.iter().filter(|o| o.is_failure()).count();
            if failures > 0 {
                anyhow::bail!("{failures} sync operations failed");
            }
        }
    }

    Ok(())
}

fn print_analysis(deck_name: &str, analysis: &SyncAnalysis) {
    println!("Deck: {deck_name}");
    println!(
        "{} cards extracted: {} to add, {} to update, {} to remove",
        analysis.total_extracted,
        analysis.to_add.len(),
        analysis.to_update.len(),
        analysis.to_delete.len()
    );

    let sections = [
        ('+', &analysis.to_add),
        ('~', &analysis.to_update),
        ('-', &analysis.to_delete),
    ];
    for (marker, infos) in sections {
        for info in infos {
            println!("  {marker} {}", info.card.question);
        }
    }

    if analysis.is_up_to_date() {
        println!("Everything is up to date.");
    }
}
