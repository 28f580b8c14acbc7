use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::catalog::Catalog;
use crate::models::Feature;

const FIXED_COLUMNS: [&str; 8] = [
    "wals_code",
    "iso_code",
    "glottocode",
    "Name",
    "latitude",
    "longitude",
    "genus",
    "family",
];

/// Sort key for feature ids like "1A", "13A", "144Y": number first, then suffix.
fn feature_order(feature: &Feature) -> (u32, String) {
    let digits: String = feature.id.chars().take_while(|c| c.is_ascii_digit()).collect();
    let number = digits.parse().unwrap_or(u32::MAX);
    (number, feature.id[digits.len()..].to_string())
}

/// Write the language × feature matrix as CSV.
pub fn write_matrix<W: Write>(catalog: &Catalog, out: W) -> Result<()> {
    let mut features: Vec<&Feature> = catalog.features.iter().collect();
    features.sort_by_key(|f| feature_order(f));

    let mut languages: Vec<_> = catalog.languages.iter().collect();
    languages.sort_by(|a, b| a.id.cmp(&b.id));

    let mut writer = csv::Writer::from_writer(out);

    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(features.iter().map(|f| format!("{} {}", f.id, f.name)));
    writer.write_record(&header)?;

    for lang in languages {
        let genus = catalog.genus(&lang.genus_id);
        let family = catalog.family_of(lang);

        let mut row: Vec<String> = vec![
            lang.id.clone(),
            lang.identifier("iso639-3").unwrap_or_default().to_string(),
            lang.identifier("glottolog").unwrap_or_default().to_string(),
            lang.name.clone(),
            lang.latitude.map(|v| v.to_string()).unwrap_or_default(),
            lang.longitude.map(|v| v.to_string()).unwrap_or_default(),
            genus.map(|g| g.name.clone()).unwrap_or_default(),
            family.map(|f| f.name.clone()).unwrap_or_default(),
        ];

        for feature in &features {
            let cell = catalog
                .value_set(&feature.id, &lang.id)
                .and_then(|vs| feature.domain_element(vs.number))
                .map(|de| format!("{} {}", de.number, de.name))
                .unwrap_or_default();
            row.push(cell);
        }

        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Render the matrix into memory.
pub fn matrix_csv(catalog: &Catalog) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_matrix(catalog, &mut buf)?;
    Ok(buf)
}

/// Write the matrix to `path` (atomic write via temp file + rename).
pub fn create(catalog: &Catalog, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("csv.tmp");
    let file = std::fs::File::create(&tmp_path)
        .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
    write_matrix(catalog, std::io::BufWriter::new(file))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    tracing::info!(
        "Wrote matrix of {} languages to {}",
        catalog.languages.len(),
        path.display()
    );
    Ok(())
}
