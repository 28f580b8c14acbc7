//! OAI-PMH repository of the bibliographic sources, with OLAC metadata.
//!
//! Sources are harvested in `pk` order; `from` is inclusive and `until`
//! exclusive, both at day granularity.

use chrono::{DateTime, NaiveDate, Utc};
use quick_xml::escape::escape;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::catalog::Catalog;
use crate::models::Source;

const SCHEME: &str = "oai";
const DELIMITER: char = ':';
const DATE_FORMAT: &str = "%Y-%m-%d";

const SYNOPSIS: &str = "The World Atlas of Language Structures Online is a large database \
    of structural (phonological, grammatical, lexical) properties of languages gathered from \
    descriptive materials (such as reference grammars). The RefDB archive contains \
    bibliographical records for all resources cited in WALS Online.";

/// Query parameters of `GET /refdb_oai`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OaiRequest {
    pub verb: Option<String>,
    pub identifier: Option<String>,
    #[serde(rename = "metadataPrefix")]
    pub metadata_prefix: Option<String>,
    pub from: Option<String>,
    pub until: Option<String>,
    pub set: Option<String>,
    #[serde(rename = "resumptionToken")]
    pub resumption_token: Option<String>,
    /// Arguments not defined by the protocol
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl OaiRequest {
    /// Names of the protocol arguments present, besides `verb`.
    fn arguments(&self) -> Vec<&'static str> {
        [
            ("identifier", self.identifier.is_some()),
            ("metadataPrefix", self.metadata_prefix.is_some()),
            ("from", self.from.is_some()),
            ("until", self.until.is_some()),
            ("set", self.set.is_some()),
            ("resumptionToken", self.resumption_token.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Identify,
    ListMetadataFormats,
    ListIdentifiers,
    ListRecords,
    GetRecord,
}

impl Verb {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "Identify" => Some(Verb::Identify),
            "ListMetadataFormats" => Some(Verb::ListMetadataFormats),
            "ListIdentifiers" => Some(Verb::ListIdentifiers),
            "ListRecords" => Some(Verb::ListRecords),
            "GetRecord" => Some(Verb::GetRecord),
            _ => None,
        }
    }

    /// Arguments the verb accepts, besides `verb`.
    fn allowed_arguments(&self) -> &'static [&'static str] {
        match self {
            Verb::Identify => &[],
            Verb::ListMetadataFormats => &["identifier"],
            Verb::ListIdentifiers | Verb::ListRecords => {
                &["metadataPrefix", "from", "until", "set", "resumptionToken"]
            }
            Verb::GetRecord => &["identifier", "metadataPrefix"],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Verb::Identify => "Identify",
            Verb::ListMetadataFormats => "ListMetadataFormats",
            Verb::ListIdentifiers => "ListIdentifiers",
            Verb::ListRecords => "ListRecords",
            Verb::GetRecord => "GetRecord",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataFormat {
    Olac,
    OaiDc,
}

impl MetadataFormat {
    const ALL: [MetadataFormat; 2] = [MetadataFormat::Olac, MetadataFormat::OaiDc];

    fn parse(s: &str) -> Option<Self> {
        match s {
            "olac" => Some(MetadataFormat::Olac),
            "oai_dc" => Some(MetadataFormat::OaiDc),
            _ => None,
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            MetadataFormat::Olac => "olac",
            MetadataFormat::OaiDc => "oai_dc",
        }
    }

    fn schema(&self) -> &'static str {
        match self {
            MetadataFormat::Olac => "http://www.language-archives.org/OLAC/1.1/olac.xsd",
            MetadataFormat::OaiDc => "http://www.openarchives.org/OAI/2.0/oai_dc.xsd",
        }
    }

    fn namespace(&self) -> &'static str {
        match self {
            MetadataFormat::Olac => "http://www.language-archives.org/OLAC/1.1/",
            MetadataFormat::OaiDc => "http://www.openarchives.org/OAI/2.0/oai_dc/",
        }
    }
}

/// OAI-PMH error conditions, rendered as `<error code="...">`.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OaiError {
    #[error("Illegal or missing verb")]
    BadVerb,
    #[error("{0}")]
    BadArgument(String),
    #[error("Invalid resumption token {0:?}")]
    BadResumptionToken(String),
    #[error("Unsupported metadata format {0:?}")]
    CannotDisseminateFormat(String),
    #[error("No record with identifier {0:?}")]
    IdDoesNotExist(String),
    #[error("No records match the request")]
    NoRecordsMatch,
    #[error("This repository does not support sets")]
    NoSetHierarchy,
}

impl OaiError {
    pub fn code(&self) -> &'static str {
        match self {
            OaiError::BadVerb => "badVerb",
            OaiError::BadArgument(_) => "badArgument",
            OaiError::BadResumptionToken(_) => "badResumptionToken",
            OaiError::CannotDisseminateFormat(_) => "cannotDisseminateFormat",
            OaiError::IdDoesNotExist(_) => "idDoesNotExist",
            OaiError::NoRecordsMatch => "noRecordsMatch",
            OaiError::NoSetHierarchy => "noSetHierarchy",
        }
    }
}

/// An OAI-PMH view over the catalog's sources.
pub struct SourceArchive<'a> {
    catalog: &'a Catalog,
}

impl<'a> SourceArchive<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/refdb_oai", self.catalog.dataset.domain)
    }

    pub fn format_identifier(&self, source: &Source) -> String {
        format!(
            "{SCHEME}{DELIMITER}refdb.{}{DELIMITER}{}",
            self.catalog.dataset.domain, source.pk
        )
    }

    /// The `pk` encoded in an identifier; only the last segment counts.
    pub fn parse_identifier(&self, identifier: &str) -> Option<u64> {
        if !identifier.contains(DELIMITER) {
            return None;
        }
        identifier.rsplit(DELIMITER).next()?.parse().ok()
    }

    pub fn earliest_record(&self) -> Option<&'a Source> {
        self.catalog
            .sources
            .iter()
            .min_by(|a, b| a.updated.cmp(&b.updated).then_with(|| a.pk.cmp(&b.pk)))
    }

    pub fn get_record(&self, identifier: &str) -> Option<&'a Source> {
        self.parse_identifier(identifier)
            .and_then(|pk| self.catalog.source_by_pk(pk))
    }

    pub fn query_records(
        &self,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Vec<&'a Source> {
        // Catalog keeps sources sorted by pk
        self.catalog
            .sources
            .iter()
            .filter(|s| from.map_or(true, |f| s.updated >= f))
            .filter(|s| until.map_or(true, |u| s.updated < u))
            .collect()
    }

    /// Answer one OAI-PMH request with a complete XML document.
    pub fn respond(&self, req: &OaiRequest, now: DateTime<Utc>) -> String {
        let verb = req.verb.as_deref().and_then(Verb::parse);

        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(
            "<OAI-PMH xmlns=\"http://www.openarchives.org/OAI/2.0/\" \
             xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
             xsi:schemaLocation=\"http://www.openarchives.org/OAI/2.0/ \
             http://www.openarchives.org/OAI/2.0/OAI-PMH.xsd\">\n",
        );
        let _ = writeln!(
            xml,
            "  <responseDate>{}</responseDate>",
            now.format("%Y-%m-%dT%H:%M:%SZ")
        );

        let body = match verb {
            None => Err(OaiError::BadVerb),
            Some(v) => check_arguments(v, req).and_then(|()| match v {
                Verb::Identify => Ok(self.identify(now)),
                Verb::ListMetadataFormats => self.list_metadata_formats(req),
                Verb::ListIdentifiers => self.list(req, false),
                Verb::ListRecords => self.list(req, true),
                Verb::GetRecord => self.get_record_xml(req),
            }),
        };

        let base_url = self.base_url();
        match (verb, &body) {
            // badVerb and badArgument echo the base URL without attributes
            (None, _) | (_, Err(OaiError::BadVerb | OaiError::BadArgument(_))) => {
                let _ = writeln!(xml, "  <request>{}</request>", escape(base_url.as_str()));
            }
            (Some(v), _) => {
                let _ = writeln!(
                    xml,
                    "  <request verb=\"{}\">{}</request>",
                    v.as_str(),
                    escape(base_url.as_str())
                );
            }
        }

        match body {
            Ok(body) => xml.push_str(&body),
            Err(e) => {
                tracing::debug!("OAI-PMH error {}: {e}", e.code());
                let _ = writeln!(
                    xml,
                    "  <error code=\"{}\">{}</error>",
                    e.code(),
                    escape(e.to_string().as_str())
                );
            }
        }

        xml.push_str("</OAI-PMH>\n");
        xml
    }

    fn identify(&self, now: DateTime<Utc>) -> String {
        let dataset = &self.catalog.dataset;
        let earliest = self
            .earliest_record()
            .map(|s| s.updated)
            .unwrap_or_else(|| now.date_naive());

        let mut xml = String::from("  <Identify>\n");
        let _ = writeln!(
            xml,
            "    <repositoryName>{} RefDB</repositoryName>",
            escape(dataset.name.as_str())
        );
        let _ = writeln!(xml, "    <baseURL>{}</baseURL>", escape(self.base_url().as_str()));
        xml.push_str("    <protocolVersion>2.0</protocolVersion>\n");
        let _ = writeln!(xml, "    <adminEmail>{}</adminEmail>", escape(dataset.contact.as_str()));
        let _ = writeln!(
            xml,
            "    <earliestDatestamp>{}</earliestDatestamp>",
            earliest.format(DATE_FORMAT)
        );
        xml.push_str("    <deletedRecord>no</deletedRecord>\n");
        xml.push_str("    <granularity>YYYY-MM-DD</granularity>\n");

        xml.push_str("    <description>\n");
        let _ = writeln!(
            xml,
            "      <olac-archive xmlns=\"http://www.language-archives.org/OLAC/1.1/olac-archive\" \
             type=\"institutional\" currentAsOf=\"{}\">",
            now.format(DATE_FORMAT)
        );
        let _ = writeln!(xml, "        <archiveURL>{}</archiveURL>", escape(self.base_url().as_str()));

        let admin = dataset.admin.iter().map(|p| ("Admin", p));
        let editors = dataset.editors.iter().map(|p| ("Editor", p));
        for (role, person) in admin.chain(editors) {
            let email = person.email.as_deref().unwrap_or(dataset.contact.as_str());
            let _ = writeln!(
                xml,
                "        <participant role=\"{}\" name=\"{}\" email=\"{}\"/>",
                role,
                escape(person.name.as_str()),
                escape(email)
            );
        }

        let _ = writeln!(
            xml,
            "        <institution>{}</institution>",
            escape(dataset.publisher_name.as_str())
        );
        let _ = writeln!(
            xml,
            "        <institutionURL>{}</institutionURL>",
            escape(dataset.publisher_url.as_str())
        );
        let _ = writeln!(
            xml,
            "        <shortLocation>{}, Germany</shortLocation>",
            escape(dataset.publisher_place.as_str())
        );
        let _ = writeln!(xml, "        <synopsis>{}</synopsis>", escape(SYNOPSIS));
        xml.push_str("      </olac-archive>\n");
        xml.push_str("    </description>\n");
        xml.push_str("  </Identify>\n");
        xml
    }

    fn list_metadata_formats(&self, req: &OaiRequest) -> Result<String, OaiError> {
        if let Some(identifier) = req.identifier.as_deref() {
            if self.get_record(identifier).is_none() {
                return Err(OaiError::IdDoesNotExist(identifier.to_string()));
            }
        }

        let mut xml = String::from("  <ListMetadataFormats>\n");
        for format in MetadataFormat::ALL {
            xml.push_str("    <metadataFormat>\n");
            let _ = writeln!(xml, "      <metadataPrefix>{}</metadataPrefix>", format.prefix());
            let _ = writeln!(xml, "      <schema>{}</schema>", format.schema());
            let _ = writeln!(
                xml,
                "      <metadataNamespace>{}</metadataNamespace>",
                format.namespace()
            );
            xml.push_str("    </metadataFormat>\n");
        }
        xml.push_str("  </ListMetadataFormats>\n");
        Ok(xml)
    }

    fn list(&self, req: &OaiRequest, with_metadata: bool) -> Result<String, OaiError> {
        let format = metadata_format(req)?;
        let from = parse_date("from", req.from.as_deref())?;
        let until = parse_date("until", req.until.as_deref())?;

        let records = self.query_records(from, until);
        if records.is_empty() {
            return Err(OaiError::NoRecordsMatch);
        }

        let tag = if with_metadata { "ListRecords" } else { "ListIdentifiers" };
        let mut xml = format!("  <{tag}>\n");
        for source in records {
            if with_metadata {
                xml.push_str(&self.record_xml(source, format));
            } else {
                xml.push_str(&self.header_xml(source, "    "));
            }
        }
        let _ = writeln!(xml, "  </{tag}>");
        Ok(xml)
    }

    fn get_record_xml(&self, req: &OaiRequest) -> Result<String, OaiError> {
        let identifier = req
            .identifier
            .as_deref()
            .ok_or_else(|| OaiError::BadArgument("Missing identifier".to_string()))?;
        let format = metadata_format(req)?;
        let source = self
            .get_record(identifier)
            .ok_or_else(|| OaiError::IdDoesNotExist(identifier.to_string()))?;

        Ok(format!("  <GetRecord>\n{}  </GetRecord>\n", self.record_xml(source, format)))
    }

    fn header_xml(&self, source: &Source, indent: &str) -> String {
        format!(
            "{indent}<header>\n{indent}  <identifier>{}</identifier>\n{indent}  <datestamp>{}</datestamp>\n{indent}</header>\n",
            escape(self.format_identifier(source).as_str()),
            source.updated.format(DATE_FORMAT)
        )
    }

    fn record_xml(&self, source: &Source, format: MetadataFormat) -> String {
        let mut xml = String::from("    <record>\n");
        xml.push_str(&self.header_xml(source, "      "));
        xml.push_str("      <metadata>\n");

        match format {
            MetadataFormat::Olac => xml.push_str(
                "        <olac:olac xmlns:olac=\"http://www.language-archives.org/OLAC/1.1/\" \
                 xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
                 xmlns:dcterms=\"http://purl.org/dc/terms/\">\n",
            ),
            MetadataFormat::OaiDc => xml.push_str(
                "        <oai_dc:dc xmlns:oai_dc=\"http://www.openarchives.org/OAI/2.0/oai_dc/\" \
                 xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n",
            ),
        }

        let title = source.title.as_deref().unwrap_or(source.name.as_str());
        let _ = writeln!(xml, "          <dc:title>{}</dc:title>", escape(title));
        if let Some(author) = &source.author {
            let _ = writeln!(xml, "          <dc:creator>{}</dc:creator>", escape(author.as_str()));
        }
        if let Some(year) = &source.year {
            let tag = match format {
                MetadataFormat::Olac => "dcterms:issued",
                MetadataFormat::OaiDc => "dc:date",
            };
            let _ = writeln!(xml, "          <{tag}>{}</{tag}>", escape(year.as_str()));
        }
        if let Some(description) = &source.description {
            let _ = writeln!(
                xml,
                "          <dc:description>{}</dc:description>",
                escape(description.as_str())
            );
        }
        let _ = writeln!(xml, "          <dc:identifier>{}</dc:identifier>", escape(source.id.as_str()));

        match format {
            MetadataFormat::Olac => xml.push_str("        </olac:olac>\n"),
            MetadataFormat::OaiDc => xml.push_str("        </oai_dc:dc>\n"),
        }
        xml.push_str("      </metadata>\n");
        xml.push_str("    </record>\n");
        xml
    }
}

/// Reject arguments the verb does not define. This archive hands out no
/// resumption tokens and has no sets, so any token or set is an error.
fn check_arguments(verb: Verb, req: &OaiRequest) -> Result<(), OaiError> {
    if let Some(name) = req.extra.keys().next() {
        return Err(OaiError::BadArgument(format!("Illegal argument {name:?}")));
    }

    let arguments = req.arguments();
    if let Some(name) = arguments
        .iter()
        .find(|name| !verb.allowed_arguments().contains(*name))
    {
        return Err(OaiError::BadArgument(format!(
            "Argument {name:?} is not allowed for {}",
            verb.as_str()
        )));
    }

    if let Some(token) = &req.resumption_token {
        if arguments.len() > 1 {
            return Err(OaiError::BadArgument(
                "resumptionToken is an exclusive argument".to_string(),
            ));
        }
        return Err(OaiError::BadResumptionToken(token.clone()));
    }
    if req.set.is_some() {
        return Err(OaiError::NoSetHierarchy);
    }
    Ok(())
}

fn metadata_format(req: &OaiRequest) -> Result<MetadataFormat, OaiError> {
    let prefix = req
        .metadata_prefix
        .as_deref()
        .ok_or_else(|| OaiError::BadArgument("Missing metadataPrefix".to_string()))?;
    MetadataFormat::parse(prefix).ok_or_else(|| OaiError::CannotDisseminateFormat(prefix.to_string()))
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, OaiError> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v, DATE_FORMAT)
                .map_err(|_| OaiError::BadArgument(format!("Invalid {name} date {v:?}")))
        })
        .transpose()
}
