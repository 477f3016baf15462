//! Query safety classification
//!
//! The default gate is a prefix check on the leading keyword of the query.
//! It is not a parser: `select 1; drop table x` passes. The read-only data
//! source connection is the real trust boundary; this gate only turns away
//! obvious write statements early with a readable error.

/// Keywords rejected by the current denylist revision
pub const CURRENT_DENYLIST: &[&str] = &[
    "insert", "update", "delete", "drop", "alter", "grant", "revoke", "execute", "truncate",
    "create", "commit", "rollback", "savepoint", "do", "call", "lock", "reindex",
];

/// Keywords that only the legacy revision rejects
pub const LEGACY_ONLY_KEYWORDS: &[&str] = &[
    "deny", "set transaction", "explain", "listen", "load", "notify", "prepare", "reassign",
    "release", "reset",
];

/// Outcome of classifying a raw query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryVerdict {
    /// Query may be executed
    Allowed,

    /// Query starts with a denylisted keyword
    RejectedProhibitedKeyword(String),

    /// Query does not start with `select`
    RejectedNotSelect,

    /// Query holds more than one statement
    RejectedMultiStatement,
}

/// Policy deciding whether a raw query may run
pub trait QueryClassifier: Send + Sync {
    fn classify(&self, query: &str) -> QueryVerdict;
}

/// Which built-in denylist to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DenylistRevision {
    #[default]
    Current,
    Legacy,
}

/// Ordered set of lowercase keyword prefixes that reject a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    keywords: Vec<String>,
}

impl Denylist {
    /// The denylist in use by default
    pub fn current() -> Self {
        Self::custom(CURRENT_DENYLIST.iter().copied())
    }

    /// The earlier, larger denylist
    pub fn legacy() -> Self {
        Self::custom(
            CURRENT_DENYLIST
                .iter()
                .chain(LEGACY_ONLY_KEYWORDS.iter())
                .copied(),
        )
    }

    /// Build a denylist from arbitrary keywords; they are lowercased
    pub fn custom<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !list.contains(&keyword) {
                list.push(keyword);
            }
        }
        Self { keywords: list }
    }

    pub fn for_revision(revision: DenylistRevision) -> Self {
        match revision {
            DenylistRevision::Current => Self::current(),
            DenylistRevision::Legacy => Self::legacy(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// First keyword, in list order, that `normalized` starts with
    pub fn matching_prefix(&self, normalized: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|keyword| normalized.starts_with(keyword.as_str()))
            .map(String::as_str)
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::current()
    }
}

/// Shallow prefix gate: denylist first, then require a leading `select`.
///
/// Both checks run on the lowercased query with leading whitespace removed.
#[derive(Debug, Clone, Default)]
pub struct PrefixGate {
    denylist: Denylist,
}

impl PrefixGate {
    pub fn new(denylist: Denylist) -> Self {
        Self { denylist }
    }
}

impl QueryClassifier for PrefixGate {
    fn classify(&self, query: &str) -> QueryVerdict {
        let lowered = query.to_lowercase();
        let normalized = lowered.trim_start();

        if let Some(keyword) = self.denylist.matching_prefix(normalized) {
            return QueryVerdict::RejectedProhibitedKeyword(keyword.to_string());
        }

        if !normalized.starts_with("select") {
            return QueryVerdict::RejectedNotSelect;
        }

        QueryVerdict::Allowed
    }
}

/// Stricter gate that refuses multi-statement input before delegating
#[derive(Debug, Clone, Default)]
pub struct SingleStatementGate<C> {
    inner: C,
}

impl<C: QueryClassifier> SingleStatementGate<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: QueryClassifier> QueryClassifier for SingleStatementGate<C> {
    fn classify(&self, query: &str) -> QueryVerdict {
        let mut candidate = query.trim();
        while let Some(stripped) = candidate.strip_suffix(';') {
            candidate = stripped.trim_end();
        }

        if candidate.contains(';') {
            return QueryVerdict::RejectedMultiStatement;
        }

        self.inner.classify(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> PrefixGate {
        PrefixGate::default()
    }

    #[test]
    fn test_select_allowed() {
        assert_eq!(gate().classify("SELECT 1"), QueryVerdict::Allowed);
        assert_eq!(gate().classify("   select 1"), QueryVerdict::Allowed);
        assert_eq!(gate().classify("\n\tSeLeCt * from t"), QueryVerdict::Allowed);
    }

    #[test]
    fn test_every_denylisted_keyword_rejected() {
        for keyword in CURRENT_DENYLIST {
            let upper = format!("{} something", keyword.to_uppercase());
            let padded = format!("  {} something", keyword);
            for query in [upper, padded] {
                assert!(
                    matches!(
                        gate().classify(&query),
                        QueryVerdict::RejectedProhibitedKeyword(_)
                    ),
                    "expected rejection for {:?}",
                    query
                );
            }
        }
    }

    #[test]
    fn test_drop_reports_keyword() {
        assert_eq!(
            gate().classify("DROP TABLE x"),
            QueryVerdict::RejectedProhibitedKeyword("drop".to_string())
        );
    }

    #[test]
    fn test_not_select() {
        assert_eq!(
            gate().classify("with x as (select 1) select * from x"),
            QueryVerdict::RejectedNotSelect
        );
        assert_eq!(gate().classify("vacuum"), QueryVerdict::RejectedNotSelect);
        assert_eq!(gate().classify(""), QueryVerdict::RejectedNotSelect);
    }

    #[test]
    fn test_shallow_gate_lets_trailing_statements_through() {
        assert_eq!(
            gate().classify("select 1; drop table x"),
            QueryVerdict::Allowed
        );
    }

    #[test]
    fn test_legacy_revision() {
        let current = gate();
        let legacy = PrefixGate::new(Denylist::legacy());

        assert_eq!(current.classify("explain select 1"), QueryVerdict::RejectedNotSelect);
        assert_eq!(
            legacy.classify("EXPLAIN select 1"),
            QueryVerdict::RejectedProhibitedKeyword("explain".to_string())
        );
        assert_eq!(
            legacy.classify("set transaction read only"),
            QueryVerdict::RejectedProhibitedKeyword("set transaction".to_string())
        );
    }

    #[test]
    fn test_custom_denylist_is_normalized() {
        let list = Denylist::custom(["  MERGE ", "merge", ""]);
        assert_eq!(list.keywords(), &["merge".to_string()]);
        let gate = PrefixGate::new(list);
        assert_eq!(
            gate.classify("Merge into t"),
            QueryVerdict::RejectedProhibitedKeyword("merge".to_string())
        );
        assert_eq!(gate.classify("drop table t"), QueryVerdict::RejectedNotSelect);
    }

    #[test]
    fn test_single_statement_gate() {
        let strict = SingleStatementGate::new(gate());

        assert_eq!(strict.classify("select 1;"), QueryVerdict::Allowed);
        assert_eq!(strict.classify("select 1 ; ;  "), QueryVerdict::Allowed);
        assert_eq!(
            strict.classify("select 1; drop table x"),
            QueryVerdict::RejectedMultiStatement
        );
        assert_eq!(
            strict.classify("delete from x"),
            QueryVerdict::RejectedProhibitedKeyword("delete".to_string())
        );
    }
}
