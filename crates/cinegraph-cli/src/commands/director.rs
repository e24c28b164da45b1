//! Director commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use cinegraph_core::director::{self, model::CreateDirectorInput};
use cinegraph_graph::Neo4jStore;

use crate::output;

#[derive(Subcommand)]
pub enum DirectorCommands {
    /// Create a director
    Create(CreateArgs),

    /// Show a director with their movies and awards
    Get {
        /// Director ID
        id: String,
    },

    /// List all directors
    List,

    /// Delete a director and their edges
    Delete {
        /// Director ID
        id: String,
    },
}

#[derive(Args)]
pub struct CreateArgs {
    /// Director name
    pub name: String,

    /// Birthdate, e.g. 1970-07-30
    #[arg(long, short)]
    pub birthdate: String,

    /// Award already won (can be repeated)
    #[arg(long = "award")]
    pub awards: Vec<String>,
}

pub async fn execute(cmd: DirectorCommands, store: &Neo4jStore) -> Result<()> {
    match cmd {
        DirectorCommands::Create(args) => {
            let mut input = CreateDirectorInput::new(args.name, args.birthdate);
            for award in args.awards {
                input = input.with_award(award);
            }
            let created = director::create_director(store, input).await?;
            output::success(&created.message);
            output::print_json(&created)
        }
        DirectorCommands::Get { id } => output::print_json(&director::get_director(store, &id).await?),
        DirectorCommands::List => {
            output::print_list(&director::list_directors(store).await?, "No directors found.")
        }
        DirectorCommands::Delete { id } => {
            let ack = director::delete_director(store, &id).await?;
            output::success(&ack.message);
            Ok(())
        }
    }
}
