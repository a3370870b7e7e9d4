//! Command-line flags.

use clap::Parser;
use std::path::PathBuf;
use userreg_core::RegistryConfig;

#[derive(Debug, Parser)]
#[command(name = "userreg")]
#[command(about = "Interactive user registry editor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite file holding the registry (default: $USERREG_DB_PATH or temp dir)
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Keep users in memory only; nothing is written to disk
    #[arg(long, conflicts_with = "db")]
    pub memory: bool,

    /// trace|debug|info|warn|error
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Applies flags on top of environment-derived settings.
    pub fn apply(&self, mut config: RegistryConfig) -> RegistryConfig {
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = Some(dir.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use std::path::PathBuf;
    use userreg_core::RegistryConfig;

    #[test]
    fn flags_override_environment_config() {
        let cli = Cli::parse_from(["userreg", "--db", "/tmp/a.db", "--log-level", "warn"]);
        let config = cli.apply(RegistryConfig::default());

        assert_eq!(config.db_path, PathBuf::from("/tmp/a.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn memory_conflicts_with_db() {
        let result = Cli::try_parse_from(["userreg", "--memory", "--db", "/tmp/a.db"]);
        assert!(result.is_err());
    }
}
