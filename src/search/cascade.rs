use std::collections::HashSet;

use crate::models::{DisplayRecord, LanguoidQuery, LanguoidRef};

/// The sources the autocomplete draws from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Languages matched by name
    Language,
    /// Languages matched by one of their alternative identifiers
    LanguageByIdentifier,
    /// Genera matched by name
    Genus,
    /// Families matched by name
    Family,
}

impl EntityKind {
    /// Order in which the cascade consults the sources.
    pub const CASCADE: [EntityKind; 4] = [
        EntityKind::Language,
        EntityKind::LanguageByIdentifier,
        EntityKind::Genus,
        EntityKind::Family,
    ];
}

/// One unformatted match from a single source.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub kind: EntityKind,
    /// Backing record; this, not `name`, is what deduplication compares.
    pub languoid: LanguoidRef,
    pub name: String,
}

/// Case-insensitive substring search over one entity kind.
///
/// Implementations must return at most `limit` candidates, in an order that
/// is stable for a given input. Candidates of [`EntityKind::LanguageByIdentifier`]
/// must be unique per language.
pub trait LookupProvider {
    fn search(&self, kind: EntityKind, text: &str, limit: usize) -> anyhow::Result<Vec<Candidate>>;
}

/// Lookup of a single languoid by key prefix and id.
pub trait DirectLookup {
    /// `Ok(None)` for an unknown prefix or a missing record.
    fn get_by_kind_and_id(&self, prefix: char, id: &str) -> anyhow::Result<Option<LanguoidRef>>;
}

/// Turns a candidate into what the select widget displays.
pub trait ResultFormatter {
    fn format(&self, candidate: &Candidate) -> DisplayRecord;
}

/// Outcome of a resolve call. Callers redirect on `Redirect` and render on `List`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveResult {
    Redirect(LanguoidRef),
    List {
        results: Vec<DisplayRecord>,
        more: bool,
    },
}

impl ResolveResult {
    fn empty() -> Self {
        ResolveResult::List {
            results: Vec::new(),
            more: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("No languoid found for {0:?}")]
    NotFound(String),
    #[error("Malformed languoid key {0:?}")]
    InvalidInput(String),
    #[error("Languoid lookup failed: {0:#}")]
    Provider(#[from] anyhow::Error),
}

impl ResolveError {
    /// Both direct-key failures look the same to a client.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound(_) | ResolveError::InvalidInput(_))
    }
}

/// Split a direct-lookup key like "w-eng" into prefix and id.
///
/// Only the first `-` separates; the id may itself contain dashes.
pub fn parse_direct_key(key: &str) -> Result<(char, &str), ResolveError> {
    let (prefix, id) = key
        .split_once('-')
        .ok_or_else(|| ResolveError::InvalidInput(key.to_string()))?;

    let mut chars = prefix.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok((c, id)),
        _ => Err(ResolveError::NotFound(key.to_string())),
    }
}

/// Quota-bounded cascading search over the languoid sources.
pub struct Resolver<'a, P, F> {
    provider: &'a P,
    formatter: &'a F,
}

impl<'a, P, F> Resolver<'a, P, F>
where
    P: LookupProvider + DirectLookup,
    F: ResultFormatter,
{
    pub fn new(provider: &'a P, formatter: &'a F) -> Self {
        Self {
            provider,
            formatter,
        }
    }

    /// Resolve an autocomplete query.
    ///
    /// A direct key wins over the search text and never falls back to it.
    /// Without search text nothing is queried and the list is empty.
    pub fn resolve(
        &self,
        query: &LanguoidQuery,
        limit: usize,
    ) -> Result<ResolveResult, ResolveError> {
        if let Some(key) = query.direct_key() {
            return self.resolve_direct(key).map(ResolveResult::Redirect);
        }

        let Some(text) = query.search_text() else {
            return Ok(ResolveResult::empty());
        };

        let candidates = self.cascade(text, limit)?;
        let results = candidates
            .iter()
            .map(|c| self.formatter.format(c))
            .collect();

        // Best-effort top-N; there is no next page.
        Ok(ResolveResult::List {
            results,
            more: false,
        })
    }

    fn resolve_direct(&self, key: &str) -> Result<LanguoidRef, ResolveError> {
        let (prefix, id) = parse_direct_key(key)?;
        self.provider
            .get_by_kind_and_id(prefix, id)?
            .ok_or_else(|| ResolveError::NotFound(key.to_string()))
    }

    /// Run the stages in priority order, each capped at the quota still open
    /// when it starts. Language-by-identifier hits that repeat a language
    /// already found by name are dropped and do not consume quota.
    pub fn cascade(&self, text: &str, limit: usize) -> Result<Vec<Candidate>, ResolveError> {
        let mut results: Vec<Candidate> = Vec::new();
        let mut by_name: HashSet<LanguoidRef> = HashSet::new();
        let mut quota = limit;

        for kind in EntityKind::CASCADE {
            if quota == 0 {
                break;
            }

            let found = self.provider.search(kind, text, quota)?;
            let before = results.len();

            for candidate in found.into_iter().take(quota) {
                match kind {
                    EntityKind::Language => {
                        by_name.insert(candidate.languoid.clone());
                    }
                    EntityKind::LanguageByIdentifier if by_name.contains(&candidate.languoid) => {
                        continue;
                    }
                    _ => {}
                }
                results.push(candidate);
            }

            let accepted = results.len() - before;
            quota -= accepted;
            tracing::debug!(?kind, accepted, remaining = quota, "Languoid cascade stage done");
        }

        Ok(results)
    }
}
