use crate::models::{DisplayRecord, LanguoidType};
use crate::search::cascade::{Candidate, ResultFormatter};

/// Formats autocomplete candidates for the languoid select box.
///
/// The record id is the languoid's direct-lookup key, so picking a
/// suggestion can be sent straight back as `?id=`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguoidFormatter;

impl ResultFormatter for LanguoidFormatter {
    fn format(&self, candidate: &Candidate) -> DisplayRecord {
        let text = match candidate.languoid.kind {
            LanguoidType::Language => candidate.name.clone(),
            LanguoidType::Genus => format!("{} [genus]", candidate.name),
            LanguoidType::Family => format!("{} [family]", candidate.name),
        };

        DisplayRecord {
            id: candidate.languoid.key(),
            text,
        }
    }
}
