use cardwise_engine::commands::breakdown::{self, BreakdownOptions};
use cardwise_engine::commands::catalog;
use cardwise_engine::commands::demo;
use cardwise_engine::commands::pairs::{self, PairsOptions};
use cardwise_engine::commands::rank::{self, RankOptions};
use cardwise_engine::{EngineResult, SuccessEnvelope};

use crate::cli::{CatalogCommand, Cli, Commands, DemoCommand};

pub fn dispatch(cli: &Cli) -> EngineResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Catalog { command } => match command {
            CatalogCommand::List { catalog, .. } => catalog::list(catalog.as_deref()),
            CatalogCommand::Show {
                product_id,
                catalog,
                ..
            } => catalog::show(product_id, catalog.as_deref()),
        },
        Commands::Rank {
            spend_path,
            miles_rate,
            kind,
            top,
            catalog,
            ..
        } => rank::run(RankOptions {
            spend_path,
            catalog_override: catalog.as_deref(),
            miles_rate: *miles_rate,
            kind: *kind,
            top: *top,
        }),
        Commands::Pairs {
            spend_path,
            miles_rate,
            kind,
            top,
            catalog,
            ..
        } => pairs::run(PairsOptions {
            spend_path,
            catalog_override: catalog.as_deref(),
            miles_rate: *miles_rate,
            kind: *kind,
            top: *top,
        }),
        Commands::Breakdown {
            product_id,
            spend_path,
            miles_rate,
            catalog,
            ..
        } => breakdown::run(BreakdownOptions {
            product_id,
            spend_path,
            catalog_override: catalog.as_deref(),
            miles_rate: *miles_rate,
        }),
        Commands::Demo { command } => demo::run(demo_command_to_str(command)),
    }
}

fn demo_command_to_str(command: &DemoCommand) -> &'static str {
    match command {
        DemoCommand::Rank => "rank",
        DemoCommand::Pairs => "pairs",
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::parse_from;

    use super::dispatch;

    #[test]
    fn demo_commands_dispatch_successfully() {
        let cases: [(&[&str], &str); 2] = [
            (&["cardwise", "demo", "rank"], "demo rank"),
            (&["cardwise", "demo", "pairs"], "demo pairs"),
        ];

        for (args, expected_command) in cases {
            let parsed = parse_from(args);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                let response = dispatch(&cli);
                assert!(response.is_ok());
                if let Ok(success) = response {
                    assert_eq!(success.command, expected_command);
                }
            }
        }
    }

    #[test]
    fn breakdown_against_missing_catalog_file_fails_cleanly() {
        let parsed = parse_from([
            "cardwise",
            "breakdown",
            "prd_x",
            "spend.json",
            "--catalog",
            "/nonexistent/catalog.json",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            let response = dispatch(&cli);
            assert!(response.is_err());
            if let Err(error) = response {
                assert_eq!(error.code, "catalog_file_not_found");
            }
        }
    }
}
