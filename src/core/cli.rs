//! Command line arguments for the application

use crate::core::errors::{DrillError, DrillResult};
use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for loading a field and seeding a show
#[derive(Parser, Debug, Clone, Resource)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// path to a field configuration JSON file; the standard high school
    /// football field is used when omitted
    #[arg(long = "field")]
    pub field_path: Option<PathBuf>,

    /// where the editing toggles are saved between sessions
    #[arg(long = "settings", default_value = "drillcraft-settings.json")]
    pub settings_path: PathBuf,

    /// number of marchers in the starting show
    #[arg(long, default_value_t = 24)]
    pub marchers: u32,

    /// number of pages in the starting show
    #[arg(long, default_value_t = 4)]
    pub pages: u32,

    /// display debug information
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl CliArgs {
    pub fn validate(&self) -> DrillResult<()> {
        if self.pages == 0 {
            return Err(DrillError::Config(
                "a show needs at least one page".to_string(),
            ));
        }
        if let Some(path) = &self.field_path {
            if !path.exists() {
                return Err(DrillError::Config(format!(
                    "field file not found: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let args = CliArgs::parse_from(["drillcraft"]);
        assert_eq!(args.marchers, 24);
        assert_eq!(args.pages, 4);
        assert!(args.field_path.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn zero_pages_is_rejected() {
        let args = CliArgs::parse_from(["drillcraft", "--pages", "0"]);
        assert!(matches!(args.validate(), Err(DrillError::Config(_))));
    }

    #[test]
    fn missing_field_file_is_rejected() {
        let args = CliArgs::parse_from(["drillcraft", "--field", "/no/such/field.json"]);
        assert!(args.validate().is_err());
    }
}
