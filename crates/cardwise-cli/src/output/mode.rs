use crate::cli::{CatalogCommand, Commands};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

fn from_flag(json: bool) -> OutputMode {
    if json { OutputMode::Json } else { OutputMode::Text }
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    match command {
        Commands::Catalog { command } => match command {
            CatalogCommand::List { json, .. } | CatalogCommand::Show { json, .. } => {
                from_flag(*json)
            }
        },
        Commands::Rank { json, .. }
        | Commands::Pairs { json, .. }
        | Commands::Breakdown { json, .. } => from_flag(*json),
        Commands::Demo { .. } => OutputMode::Text,
    }
}
