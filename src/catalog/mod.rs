//! In-memory catalog of the database: languoids, features, values, sources.
//!
//! The catalog is loaded once from `catalog.json` and shared read-only
//! between requests.

pub mod lookup;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{Dataset, Family, Feature, Genus, Language, Source, ValueSet};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub dataset: Dataset,
    #[serde(default)]
    pub families: Vec<Family>,
    #[serde(default)]
    pub genera: Vec<Genus>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub values: Vec<ValueSet>,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl Catalog {
    /// Load the catalog from disk. A missing file yields an empty catalog.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!("No catalog at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        Self::from_json(&data).with_context(|| format!("Invalid catalog {}", path.display()))
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let mut catalog: Catalog = serde_json::from_str(data).context("Failed to parse catalog")?;
        catalog.normalize();
        catalog.validate()?;
        Ok(catalog)
    }

    fn normalize(&mut self) {
        for lang in &mut self.languages {
            if lang.ascii_name.is_empty() {
                lang.ascii_name = lang.name.clone();
            }
        }
        self.sources.sort_by_key(|s| s.pk);
    }

    fn validate(&self) -> Result<()> {
        for genus in &self.genera {
            if self.family(&genus.family_id).is_none() {
                anyhow::bail!("Genus {} refers to unknown family {}", genus.id, genus.family_id);
            }
        }
        for lang in &self.languages {
            if self.genus(&lang.genus_id).is_none() {
                anyhow::bail!("Language {} refers to unknown genus {}", lang.id, lang.genus_id);
            }
        }
        for vs in &self.values {
            let feature = self
                .feature(&vs.feature_id)
                .with_context(|| format!("Value {} refers to unknown feature", vs.id()))?;
            if self.language(&vs.language_id).is_none() {
                anyhow::bail!("Value {} refers to unknown language", vs.id());
            }
            if feature.domain_element(vs.number).is_none() {
                anyhow::bail!("Value {} is outside the domain of {}", vs.id(), feature.id);
            }
        }
        Ok(())
    }

    pub fn family(&self, id: &str) -> Option<&Family> {
        self.families.iter().find(|f| f.id == id)
    }

    pub fn genus(&self, id: &str) -> Option<&Genus> {
        self.genera.iter().find(|g| g.id == id)
    }

    pub fn language(&self, id: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.id == id)
    }

    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn value_set(&self, feature_id: &str, language_id: &str) -> Option<&ValueSet> {
        self.values
            .iter()
            .find(|v| v.feature_id == feature_id && v.language_id == language_id)
    }

    pub fn source_by_pk(&self, pk: u64) -> Option<&Source> {
        self.sources.iter().find(|s| s.pk == pk)
    }

    /// Family a language belongs to, via its genus.
    pub fn family_of(&self, language: &Language) -> Option<&Family> {
        self.genus(&language.genus_id)
            .and_then(|g| self.family(&g.family_id))
    }

    pub fn genera_of(&self, family_id: &str) -> Vec<&Genus> {
        let mut genera: Vec<&Genus> = self
            .genera
            .iter()
            .filter(|g| g.family_id == family_id)
            .collect();
        genera.sort_by(|a, b| a.id.cmp(&b.id));
        genera
    }

    pub fn languages_of(&self, genus_id: &str) -> Vec<&Language> {
        let mut languages: Vec<&Language> = self
            .languages
            .iter()
            .filter(|l| l.genus_id == genus_id)
            .collect();
        languages.sort_by(|a, b| a.ascii_name.cmp(&b.ascii_name).then_with(|| a.id.cmp(&b.id)));
        languages
    }
}
