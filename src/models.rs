use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A language family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    pub id: String,
    pub name: String,
}

/// A genus, the level below a family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genus {
    pub id: String,
    pub name: String,
    pub family_id: String,
}

/// An alternative identifier for a language (ISO code, Glottocode, other name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A language, keyed by its WALS code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: String,
    /// Sort key for language listings; falls back to `name` when missing.
    #[serde(default)]
    pub ascii_name: String,
    pub genus_id: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub identifiers: Vec<Identifier>,
}

impl Language {
    /// First identifier of the given type, e.g. "iso639-3" or "glottolog".
    pub fn identifier(&self, kind: &str) -> Option<&str> {
        self.identifiers
            .iter()
            .find(|i| i.kind == kind)
            .map(|i| i.name.as_str())
    }
}

/// One value a feature can take
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainElement {
    pub number: u32,
    pub name: String,
}

/// A typological feature such as "1A Consonant Inventories"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub domain: Vec<DomainElement>,
}

impl Feature {
    pub fn domain_element(&self, number: u32) -> Option<&DomainElement> {
        self.domain.iter().find(|d| d.number == number)
    }
}

/// The value of one feature for one language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueSet {
    pub feature_id: String,
    pub language_id: String,
    pub number: u32,
}

impl ValueSet {
    pub fn id(&self) -> String {
        format!("{}-{}", self.feature_id, self.language_id)
    }
}

/// A bibliographic source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub pk: u64,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub updated: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Editor {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Dataset-level metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub domain: String,
    pub publisher_name: String,
    pub publisher_place: String,
    pub publisher_url: String,
    pub contact: String,
    /// Person administering the OAI-PMH archive
    #[serde(default)]
    pub admin: Option<Editor>,
    #[serde(default)]
    pub editors: Vec<Editor>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            name: "The World Atlas of Language Structures Online".to_string(),
            domain: "wals.info".to_string(),
            publisher_name: "Max Planck Institute for Evolutionary Anthropology".to_string(),
            publisher_place: "Leipzig".to_string(),
            publisher_url: "https://www.eva.mpg.de".to_string(),
            contact: "contact.wals@eva.mpg.de".to_string(),
            admin: None,
            editors: Vec::new(),
        }
    }
}

/// The three kinds of languoid that can be addressed directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguoidType {
    Language,
    Genus,
    Family,
}

impl LanguoidType {
    /// Single-character key prefix, as in "w-eng".
    pub fn prefix(&self) -> char {
        match self {
            LanguoidType::Language => 'w',
            LanguoidType::Genus => 'g',
            LanguoidType::Family => 'f',
        }
    }

    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'w' => Some(LanguoidType::Language),
            'g' => Some(LanguoidType::Genus),
            'f' => Some(LanguoidType::Family),
            _ => None,
        }
    }
}

/// Identity of a catalog languoid. Two references are equal exactly when
/// they point at the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguoidRef {
    pub kind: LanguoidType,
    pub id: String,
}

impl LanguoidRef {
    pub fn language(id: impl Into<String>) -> Self {
        Self {
            kind: LanguoidType::Language,
            id: id.into(),
        }
    }

    pub fn genus(id: impl Into<String>) -> Self {
        Self {
            kind: LanguoidType::Genus,
            id: id.into(),
        }
    }

    pub fn family(id: impl Into<String>) -> Self {
        Self {
            kind: LanguoidType::Family,
            id: id.into(),
        }
    }

    /// Direct-lookup key, e.g. "w-eng".
    pub fn key(&self) -> String {
        format!("{}-{}", self.kind.prefix(), self.id)
    }

    /// Path of the languoid's page on the site.
    pub fn resource_path(&self) -> String {
        match self.kind {
            LanguoidType::Language => format!("/languoid/lect/wals_code_{}", self.id),
            LanguoidType::Genus => format!("/languoid/genus/{}", self.id),
            LanguoidType::Family => format!("/languoid/family/{}", self.id),
        }
    }
}

/// Query parameters of `GET /languoids`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguoidQuery {
    /// Direct-lookup key such as "w-eng"
    pub id: Option<String>,
    /// Free-text search term
    pub q: Option<String>,
}

impl LanguoidQuery {
    pub fn text(text: &str) -> Self {
        Self {
            id: None,
            q: Some(text.to_string()),
        }
    }

    pub fn direct(key: &str) -> Self {
        Self {
            id: Some(key.to_string()),
            q: None,
        }
    }

    /// The direct-lookup key, if one was given and is non-empty.
    pub fn direct_key(&self) -> Option<&str> {
        self.id.as_deref().filter(|k| !k.is_empty())
    }

    /// The search term, if one was given and is non-empty.
    pub fn search_text(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }
}

/// One autocomplete suggestion as shown in the select widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub id: String,
    pub text: String,
}

/// Autocomplete response
#[derive(Debug, Clone, Serialize)]
pub struct LanguoidsResponse {
    pub results: Vec<DisplayRecord>,
    pub context: serde_json::Map<String, serde_json::Value>,
    pub more: bool,
}

/// `GET /feature-info/{id}` response
#[derive(Debug, Clone, Serialize)]
pub struct FeatureInfo {
    pub name: String,
    pub values: Vec<FeatureValueInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureValueInfo {
    pub name: String,
    pub number: usize,
}

/// Genealogy tree: families with their genera and languages
#[derive(Debug, Clone, Serialize)]
pub struct GenealogyFamily {
    pub id: String,
    pub name: String,
    pub genera: Vec<GenealogyGenus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenealogyGenus {
    pub id: String,
    pub name: String,
    pub languages: Vec<GenealogyLanguage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenealogyLanguage {
    pub id: String,
    pub name: String,
}

/// Query parameters of `GET /blog`
#[derive(Debug, Clone, Deserialize)]
pub struct BlogFeedQuery {
    pub path: Option<String>,
}
