use std::path::PathBuf;

use cardwise_engine::catalog::types::ProductKind;
use clap::{Parser, Subcommand};

pub fn parse_miles_rate(value: &str) -> Result<f64, String> {
    let parsed = value
        .parse::<f64>()
        .map_err(|_| "miles rate must be a number".to_string())?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err("miles rate must be a positive number".to_string());
    }
    Ok(parsed)
}

pub fn parse_product_kind(value: &str) -> Result<ProductKind, String> {
    ProductKind::parse(value).ok_or_else(|| "type must be one of: cashback, miles".to_string())
}

/// Extended help shown after `cardwise rank --help`.
pub const SPENDING_AFTER_HELP: &str = "\
Spending file formats:
  JSON — one object mapping category names to monthly amounts:
  {
    \"dining\": 650,
    \"groceries\": 480,
    \"online\": 380,
    \"foreign_currency\": 250
  }

  CSV — a `category,amount` header plus one row per category:
  category,amount
  dining,650
  groceries,480

  <spend-path> is a local file path; use `-` to read stdin.

Categories:
  dining, groceries, petrol, transport, streaming, entertainment,
  utilities, online, travel, overseas, retail, departmental,
  foreign_currency, commuter_pass, other
  Hyphenated spellings (e.g. foreign-currency) are accepted.

Catalog resolution:
  --catalog <path> wins when given. Otherwise cardwise looks for
  $CARDWISE_HOME/catalog.json, then ~/.cardwise/catalog.json, and
  finally falls back to the built-in catalog.
";

#[derive(Debug, Parser)]
#[command(
    name = "cardwise",
    version,
    about = "card reward calculator and two-card optimizer",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect the loaded product catalog
    #[command(arg_required_else_help = true)]
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Rank every product against your monthly spending
    #[command(after_long_help = SPENDING_AFTER_HELP)]
    Rank {
        /// Path to a JSON or CSV spending file (use `-` for stdin)
        spend_path: String,
        /// Currency value of one mile, applied to mileage products
        #[arg(long, value_parser = parse_miles_rate, default_value_t = 0.02)]
        miles_rate: f64,
        /// Only consider one product type: cashback or miles
        #[arg(long, value_parser = parse_product_kind)]
        kind: Option<ProductKind>,
        /// Show only the top N products
        #[arg(long)]
        top: Option<usize>,
        /// Catalog file to use instead of the resolved default
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Emit structured JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Find the best two-product split for your monthly spending
    #[command(after_long_help = SPENDING_AFTER_HELP)]
    Pairs {
        /// Path to a JSON or CSV spending file (use `-` for stdin)
        spend_path: String,
        /// Currency value of one mile, applied to mileage products
        #[arg(long, value_parser = parse_miles_rate, default_value_t = 0.02)]
        miles_rate: f64,
        /// Only consider one product type: cashback or miles
        #[arg(long, value_parser = parse_product_kind)]
        kind: Option<ProductKind>,
        /// Show only the top N pairs
        #[arg(long)]
        top: Option<usize>,
        /// Catalog file to use instead of the resolved default
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Emit structured JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Show one product's full reward breakdown for your spending
    #[command(after_long_help = SPENDING_AFTER_HELP)]
    Breakdown {
        /// Product id from `cardwise catalog list` (e.g. prd_flat_cashback)
        product_id: String,
        /// Path to a JSON or CSV spending file (use `-` for stdin)
        spend_path: String,
        /// Currency value of one mile, applied to mileage products
        #[arg(long, value_parser = parse_miles_rate, default_value_t = 0.02)]
        miles_rate: f64,
        /// Catalog file to use instead of the resolved default
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Emit structured JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Preview cardwise with the built-in catalog and sample spending
    #[command(arg_required_else_help = true)]
    Demo {
        #[command(subcommand)]
        command: DemoCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CatalogCommand {
    /// List the products in the loaded catalog
    List {
        /// Catalog file to use instead of the resolved default
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Emit structured JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Show one product's tiers and rates
    Show {
        /// Product id from `cardwise catalog list`
        product_id: String,
        /// Catalog file to use instead of the resolved default
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Emit structured JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum DemoCommand {
    /// Rank the built-in catalog against sample spending
    Rank,
    /// Show the best sample two-product combinations
    Pairs,
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::{CatalogCommand, Commands, DemoCommand, parse_from};

    #[test]
    fn parse_command_paths() {
        let cases: [Vec<&str>; 14] = [
            vec!["cardwise", "catalog", "list"],
            vec!["cardwise", "catalog", "list", "--json"],
            vec!["cardwise", "catalog", "show", "prd_flat_cashback"],
            vec!["cardwise", "catalog", "show", "prd_flat_cashback", "--catalog", "c.json"],
            vec!["cardwise", "rank", "spend.json"],
            vec!["cardwise", "rank", "-", "--miles-rate", "0.015"],
            vec!["cardwise", "rank", "spend.csv", "--kind", "miles", "--top", "5"],
            vec!["cardwise", "rank", "spend.json", "--catalog", "c.json", "--json"],
            vec!["cardwise", "pairs", "spend.json"],
            vec!["cardwise", "pairs", "spend.json", "--top", "3", "--json"],
            vec!["cardwise", "breakdown", "prd_flat_cashback", "spend.json"],
            vec!["cardwise", "breakdown", "prd_flat_cashback", "-", "--json"],
            vec!["cardwise", "demo", "rank"],
            vec!["cardwise", "demo", "pairs"],
        ];

        for case in cases {
            let parsed = parse_from(case.clone());
            assert!(parsed.is_ok(), "failed to parse: {case:?}");
        }
    }

    #[test]
    fn parse_catalog_subcommands() {
        let parsed = parse_from(["cardwise", "catalog", "list", "--json"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(matches!(
                cli.command,
                Commands::Catalog {
                    command: CatalogCommand::List { json: true, .. }
                }
            ));
        }

        let shown = parse_from(["cardwise", "catalog", "show", "prd_a"]);
        assert!(shown.is_ok());
        if let Ok(cli) = shown {
            assert!(matches!(
                cli.command,
                Commands::Catalog {
                    command: CatalogCommand::Show { .. }
                }
            ));
        }
    }

    #[test]
    fn parse_demo_subcommands() {
        let rank = parse_from(["cardwise", "demo", "rank"]);
        assert!(rank.is_ok());
        if let Ok(cli) = rank {
            assert!(matches!(
                cli.command,
                Commands::Demo {
                    command: DemoCommand::Rank
                }
            ));
        }

        let pairs = parse_from(["cardwise", "demo", "pairs"]);
        assert!(pairs.is_ok());
        if let Ok(cli) = pairs {
            assert!(matches!(
                cli.command,
                Commands::Demo {
                    command: DemoCommand::Pairs
                }
            ));
        }
    }

    #[test]
    fn bare_demo_and_catalog_show_help() {
        for args in [["cardwise", "demo"], ["cardwise", "catalog"]] {
            let parsed = parse_from(args);
            assert!(parsed.is_err());
            if let Err(err) = parsed {
                assert_eq!(
                    err.kind(),
                    ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                );
            }
        }
    }

    #[test]
    fn negative_miles_rate_is_rejected() {
        let parsed = parse_from(["cardwise", "rank", "spend.json", "--miles-rate", "-0.02"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn zero_miles_rate_is_rejected() {
        let parsed = parse_from(["cardwise", "rank", "spend.json", "--miles-rate", "0"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let parsed = parse_from(["cardwise", "rank", "spend.json", "--kind", "points"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_spend_path_is_rejected() {
        let parsed = parse_from(["cardwise", "rank"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn default_miles_rate_applies() {
        let parsed = parse_from(["cardwise", "rank", "spend.json"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed
            && let Commands::Rank { miles_rate, .. } = cli.command
        {
            assert!((miles_rate - 0.02).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn help_command_is_rejected() {
        let parsed = parse_from(["cardwise", "help"]);
        assert!(parsed.is_err());
    }
}
