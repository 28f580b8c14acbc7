//! Languoid autocomplete: a quota-bounded cascade over four ranked sources.

pub mod cascade;
pub mod format;

pub use cascade::{
    Candidate, DirectLookup, EntityKind, LookupProvider, ResolveError, ResolveResult, Resolver,
    ResultFormatter,
};
pub use format::LanguoidFormatter;
