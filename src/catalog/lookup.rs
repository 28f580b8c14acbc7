use crate::catalog::Catalog;
use crate::models::{Language, LanguoidRef, LanguoidType};
use crate::search::cascade::{Candidate, DirectLookup, EntityKind, LookupProvider};

/// Case-insensitive substring match; `needle` must already be lower-case.
fn icontains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn by_ascii_name(a: &&Language, b: &&Language) -> std::cmp::Ordering {
    a.ascii_name
        .cmp(&b.ascii_name)
        .then_with(|| a.id.cmp(&b.id))
}

impl Catalog {
    fn languages_by_name(&self, needle: &str, limit: usize) -> Vec<Candidate> {
        let mut hits: Vec<&Language> = self
            .languages
            .iter()
            .filter(|l| icontains(&l.name, needle))
            .collect();
        hits.sort_by(by_ascii_name);
        language_candidates(EntityKind::Language, hits, limit)
    }

    /// Each language appears once, however many of its identifiers match.
    fn languages_by_identifier(&self, needle: &str, limit: usize) -> Vec<Candidate> {
        let mut hits: Vec<&Language> = self
            .languages
            .iter()
            .filter(|l| l.identifiers.iter().any(|i| icontains(&i.name, needle)))
            .collect();
        hits.sort_by(by_ascii_name);
        language_candidates(EntityKind::LanguageByIdentifier, hits, limit)
    }

    fn genera_by_name(&self, needle: &str, limit: usize) -> Vec<Candidate> {
        let mut hits: Vec<_> = self
            .genera
            .iter()
            .filter(|g| icontains(&g.name, needle))
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        hits.into_iter()
            .take(limit)
            .map(|g| Candidate {
                kind: EntityKind::Genus,
                languoid: LanguoidRef::genus(g.id.as_str()),
                name: g.name.clone(),
            })
            .collect()
    }

    fn families_by_name(&self, needle: &str, limit: usize) -> Vec<Candidate> {
        let mut hits: Vec<_> = self
            .families
            .iter()
            .filter(|f| icontains(&f.name, needle))
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        hits.into_iter()
            .take(limit)
            .map(|f| Candidate {
                kind: EntityKind::Family,
                languoid: LanguoidRef::family(f.id.as_str()),
                name: f.name.clone(),
            })
            .collect()
    }
}

fn language_candidates(kind: EntityKind, hits: Vec<&Language>, limit: usize) -> Vec<Candidate> {
    hits.into_iter()
        .take(limit)
        .map(|l| Candidate {
            kind,
            languoid: LanguoidRef::language(l.id.as_str()),
            name: l.name.clone(),
        })
        .collect()
}

impl LookupProvider for Catalog {
    fn search(&self, kind: EntityKind, text: &str, limit: usize) -> anyhow::Result<Vec<Candidate>> {
        let needle = text.to_lowercase();
        Ok(match kind {
            EntityKind::Language => self.languages_by_name(&needle, limit),
            EntityKind::LanguageByIdentifier => self.languages_by_identifier(&needle, limit),
            EntityKind::Genus => self.genera_by_name(&needle, limit),
            EntityKind::Family => self.families_by_name(&needle, limit),
        })
    }
}

impl DirectLookup for Catalog {
    fn get_by_kind_and_id(&self, prefix: char, id: &str) -> anyhow::Result<Option<LanguoidRef>> {
        let found = match LanguoidType::from_prefix(prefix) {
            Some(LanguoidType::Language) => self.language(id).map(|l| LanguoidRef::language(l.id.as_str())),
            Some(LanguoidType::Genus) => self.genus(id).map(|g| LanguoidRef::genus(g.id.as_str())),
            Some(LanguoidType::Family) => self.family(id).map(|f| LanguoidRef::family(f.id.as_str())),
            None => None,
        };
        Ok(found)
    }
}
