//! Award commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use cinegraph_core::analytics;
use cinegraph_core::award::{self, model::CreateAwardInput};
use cinegraph_graph::Neo4jStore;

use crate::output;

#[derive(Subcommand)]
pub enum AwardCommands {
    /// Create an award
    Create(CreateArgs),

    /// Show an award
    Get {
        /// Award ID
        id: String,
    },

    /// List all awards
    List,

    /// Delete an award
    Delete {
        /// Award ID
        id: String,
    },

    /// Record that an actor, director or movie won an award
    Win {
        /// Award ID
        award_id: String,
        /// Winner ID (actor, director or movie)
        winner_id: String,
    },

    /// List the winners of an award
    Winners {
        /// Award ID
        id: String,
    },
}

#[derive(Args)]
pub struct CreateArgs {
    /// Award name
    pub name: String,

    /// Year the award was given
    #[arg(long, short)]
    pub year: i64,

    /// Award category
    #[arg(long)]
    pub category: String,
}

pub async fn execute(cmd: AwardCommands, store: &Neo4jStore) -> Result<()> {
    match cmd {
        AwardCommands::Create(args) => {
            let created =
                award::create_award(store, CreateAwardInput::new(args.name, args.year, args.category)).await?;
            output::success(&created.message);
            output::print_json(&created)
        }
        AwardCommands::Get { id } => output::print_json(&award::get_award(store, &id).await?),
        AwardCommands::List => output::print_list(&award::list_awards(store).await?, "No awards found."),
        AwardCommands::Delete { id } => {
            let ack = award::delete_award(store, &id).await?;
            output::success(&ack.message);
            Ok(())
        }
        AwardCommands::Win { award_id, winner_id } => {
            let ack = award::win_award(store, &award_id, &winner_id).await?;
            output::success(&ack.message);
            Ok(())
        }
        AwardCommands::Winners { id } => {
            output::print_list(&analytics::winners(store, &id).await?, "No winners recorded.")
        }
    }
}
