//! Server configuration
//!
//! Built once at startup from CLI flags and environment variables, then
//! shared read-only through [`crate::AppState`].

use clap::{Parser, ValueEnum};
use gq_core::{
    Denylist, DenylistRevision, FilterMode, PrefixGate, QueryClassifier, SingleStatementGate,
};
use gq_data::SourceConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Which query classifier guards `/execute_sql`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ClassifierKind {
    /// Leading-keyword prefix gate
    #[default]
    Prefix,
    /// Prefix gate that also refuses multi-statement input
    Strict,
}

/// Denylist revision used by the classifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DenylistChoice {
    #[default]
    Current,
    Legacy,
}

/// How comma-separated categorical filters are read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FilterModeChoice {
    /// Character-by-character matching kept for existing clients
    #[default]
    Literal,
    /// Split on commas and match any piece
    SplitAny,
}

impl From<DenylistChoice> for DenylistRevision {
    fn from(choice: DenylistChoice) -> Self {
        match choice {
            DenylistChoice::Current => DenylistRevision::Current,
            DenylistChoice::Legacy => DenylistRevision::Legacy,
        }
    }
}

impl From<FilterModeChoice> for FilterMode {
    fn from(choice: FilterModeChoice) -> Self {
        match choice {
            FilterModeChoice::Literal => FilterMode::Literal,
            FilterModeChoice::SplitAny => FilterMode::SplitAny,
        }
    }
}

/// Geo query server configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "gq-server", version, about = "Read-only SQL and GeoJSON heatmap service")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "GQ_LISTEN_ADDR", default_value = "127.0.0.1:5000")]
    pub listen_addr: SocketAddr,

    /// SQLite database queried by every endpoint
    #[arg(long, env = "GQ_DATABASE", default_value = "data/measurements.db")]
    pub database: PathBuf,

    /// Directory holding the `.sql` templates
    #[arg(long, env = "GQ_TEMPLATES_DIR", default_value = "sql")]
    pub templates_dir: PathBuf,

    /// Re-read templates from disk on every request
    #[arg(long, env = "GQ_NO_TEMPLATE_CACHE")]
    pub no_template_cache: bool,

    /// Enable CORS (Cross-Origin Resource Sharing)
    #[arg(long, env = "GQ_CORS_ENABLED", default_value_t = true, action = clap::ArgAction::Set)]
    pub cors_enabled: bool,

    /// Query classifier for raw SQL
    #[arg(long, env = "GQ_CLASSIFIER", value_enum, default_value_t = ClassifierKind::Prefix)]
    pub classifier: ClassifierKind,

    /// Keyword denylist revision
    #[arg(long, env = "GQ_DENYLIST", value_enum, default_value_t = DenylistChoice::Current)]
    pub denylist: DenylistChoice,

    /// Interpretation of comma-separated filter values
    #[arg(long, env = "GQ_FILTER_MODE", value_enum, default_value_t = FilterModeChoice::Literal)]
    pub filter_mode: FilterModeChoice,

    /// Milliseconds a query waits on a locked database
    #[arg(long, env = "GQ_BUSY_TIMEOUT_MS", default_value = "5000")]
    pub busy_timeout_ms: u64,

    /// Log filter directive, e.g. `info,gq_core=debug`
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            database: PathBuf::from("data/measurements.db"),
            templates_dir: PathBuf::from("sql"),
            no_template_cache: false,
            cors_enabled: true,
            classifier: ClassifierKind::Prefix,
            denylist: DenylistChoice::Current,
            filter_mode: FilterModeChoice::Literal,
            busy_timeout_ms: 5_000,
            log_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Data source settings derived from this configuration
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            path: self.database.clone(),
            read_only: true,
            busy_timeout_ms: self.busy_timeout_ms,
        }
    }

    /// Build the configured query classifier
    pub fn build_classifier(&self) -> Box<dyn QueryClassifier> {
        let gate = PrefixGate::new(Denylist::for_revision(self.denylist.into()));
        match self.classifier {
            ClassifierKind::Prefix => Box::new(gate),
            ClassifierKind::Strict => Box::new(SingleStatementGate::new(gate)),
        }
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gq_core::QueryVerdict;

    #[test]
    fn test_defaults_match_cli() {
        let parsed = ServerConfig::try_parse_from(["gq-server"]).unwrap();
        let default = ServerConfig::default();
        assert_eq!(parsed.listen_addr, default.listen_addr);
        assert_eq!(parsed.classifier, default.classifier);
        assert_eq!(parsed.filter_mode, default.filter_mode);
        assert_eq!(parsed.denylist, default.denylist);
    }

    #[test]
    fn test_strict_classifier_flag() {
        let config = ServerConfig::try_parse_from([
            "gq-server",
            "--classifier",
            "strict",
            "--filter-mode",
            "split-any",
        ])
        .unwrap();

        assert_eq!(config.filter_mode(), FilterMode::SplitAny);
        assert_eq!(
            config.build_classifier().classify("select 1; select 2"),
            QueryVerdict::RejectedMultiStatement
        );
    }

    #[test]
    fn test_legacy_denylist_flag() {
        let config = ServerConfig::try_parse_from(["gq-server", "--denylist", "legacy"]).unwrap();
        assert!(matches!(
            config.build_classifier().classify("explain select 1"),
            QueryVerdict::RejectedProhibitedKeyword(_)
        ));
    }
}
