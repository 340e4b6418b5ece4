use std::env;
use std::path::{Path, PathBuf};

use crate::catalog::builtin::{BUILTIN_SOURCE, builtin_catalog};
use crate::catalog::parse::load_catalog_file;
use crate::catalog::types::CatalogEntry;
use crate::catalog::validate::validate_catalog;
use crate::contracts::types::CatalogWarning;
use crate::error::EngineResult;

pub const CATALOG_FILE_NAME: &str = "catalog.json";
pub const HOME_ENV_VAR: &str = "CARDWISE_HOME";

/// Where a catalog was loaded from, for display and cache keying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Builtin,
    File(PathBuf),
}

impl CatalogSource {
    pub fn label(&self) -> String {
        match self {
            CatalogSource::Builtin => BUILTIN_SOURCE.to_string(),
            CatalogSource::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub entries: Vec<CatalogEntry>,
    pub warnings: Vec<CatalogWarning>,
    pub source: CatalogSource,
}

/// Resolves which catalog applies: an explicit override path, else a user
/// catalog under `$CARDWISE_HOME` or `~/.cardwise/`, else the built-in set.
pub fn resolve_catalog_source(override_path: Option<&Path>) -> CatalogSource {
    if let Some(path) = override_path {
        return CatalogSource::File(path.to_path_buf());
    }
    if let Some(path) = user_catalog_path()
        && path.is_file()
    {
        return CatalogSource::File(path);
    }
    CatalogSource::Builtin
}

fn user_catalog_path() -> Option<PathBuf> {
    if let Ok(home) = env::var(HOME_ENV_VAR)
        && !home.trim().is_empty()
    {
        return Some(PathBuf::from(home).join(CATALOG_FILE_NAME));
    }
    home::home_dir().map(|home| home.join(".cardwise").join(CATALOG_FILE_NAME))
}

/// Loads and validates the resolved catalog.
pub fn load_catalog(override_path: Option<&Path>) -> EngineResult<LoadedCatalog> {
    let source = resolve_catalog_source(override_path);
    match &source {
        CatalogSource::Builtin => {
            let validated = validate_catalog(builtin_catalog())?;
            Ok(LoadedCatalog {
                entries: validated.entries,
                warnings: validated.warnings,
                source,
            })
        }
        CatalogSource::File(path) => {
            let validated = load_catalog_file(path)?;
            Ok(LoadedCatalog {
                entries: validated.entries,
                warnings: validated.warnings,
                source,
            })
        }
    }
}
