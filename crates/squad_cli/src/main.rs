//! Squad CLI
//!
//! Score player sheets and split rosters into teams from JSON files.

use anyhow::Result;
use clap::{Parser, Subcommand};
use squad_core::{AllocationRequest, ScoreCalculator, TeamAllocator};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "squad")]
#[command(about = "Score players and allocate balanced teams", long_about = None)]
struct Cli {
    /// Rules table (YAML) replacing the embedded one
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a player's score card, optionally after inverse edits
    Score {
        /// Player JSON file
        #[arg(long)]
        input: PathBuf,

        /// Target overall score, redistributed onto categories and attributes
        #[arg(long, conflicts_with = "category")]
        overall: Option<i64>,

        /// Target category score as NAME=VALUE (repeatable)
        #[arg(long)]
        category: Vec<String>,

        /// Print the full player as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Split a roster into one or two teams
    Allocate {
        /// Roster JSON file (array of entries or player sheets)
        #[arg(long)]
        roster: PathBuf,

        /// Number of teams (1 or 2)
        #[arg(long, default_value = "2")]
        teams: usize,

        /// Starters per team
        #[arg(long, default_value = "11")]
        capacity: usize,

        /// Print the allocation as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rules = squad_cli::load_rules(cli.rules.as_deref())?;
    let calculator = ScoreCalculator::new(&rules);

    match cli.command {
        Commands::Score { input, overall, category, json } => {
            let mut player = squad_cli::load_player(&calculator, &input)?;
            info!(player = player.id, overall = player.overall(), "player loaded");

            if let Some(target) = overall {
                player.set_overall_score(&calculator, target)?;
            }
            for raw in &category {
                let (category, target) = squad_cli::parse_category_edit(raw)?;
                player.set_category_score(&calculator, category, target)?;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&player)?);
            } else {
                print!("{}", squad_cli::render_score_card(&player));
            }
        }

        Commands::Allocate { roster, teams, capacity, json } => {
            let entries = squad_cli::load_roster(&calculator, &roster)?;
            info!(players = entries.len(), path = %roster.display(), "roster loaded");

            let allocator = TeamAllocator::new(&rules);
            let result = allocator.allocate(&AllocationRequest::new(entries, teams, capacity))?;
            if result.is_underfilled() {
                warn!("not every starting slot could be filled");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", squad_cli::render_allocation(&result));
            }
        }
    }

    Ok(())
}
