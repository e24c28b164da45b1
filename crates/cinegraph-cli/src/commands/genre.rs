//! Genre commands.

use anyhow::Result;
use clap::Subcommand;

use cinegraph_core::genre;
use cinegraph_graph::Neo4jStore;

use crate::output;

#[derive(Subcommand)]
pub enum GenreCommands {
    /// Create a genre, or return the existing one with that name
    Create {
        /// Genre name
        name: String,
    },

    /// Show a genre
    Get {
        /// Genre ID
        id: String,
    },

    /// List all genres
    List,

    /// Delete a genre
    Delete {
        /// Genre ID
        id: String,
    },
}

pub async fn execute(cmd: GenreCommands, store: &Neo4jStore) -> Result<()> {
    match cmd {
        GenreCommands::Create { name } => {
            let created = genre::create_genre(store, &name).await?;
            output::success(&created.message);
            output::print_json(&created)
        }
        GenreCommands::Get { id } => output::print_json(&genre::get_genre(store, &id).await?),
        GenreCommands::List => output::print_list(&genre::list_genres(store).await?, "No genres found."),
        GenreCommands::Delete { id } => {
            let ack = genre::delete_genre(store, &id).await?;
            output::success(&ack.message);
            Ok(())
        }
    }
}
