use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::models::{
    FeatureInfo, FeatureValueInfo, GenealogyFamily, GenealogyGenus, GenealogyLanguage,
};
use crate::state::AppState;

/// GET /feature-info/{id} - Feature name and its values, numbered from 1
pub async fn feature_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FeatureInfo>, (StatusCode, String)> {
    let feature = state
        .catalog
        .feature(&id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Feature {id} not found")))?;

    Ok(Json(FeatureInfo {
        name: feature.name.clone(),
        values: feature
            .domain
            .iter()
            .enumerate()
            .map(|(i, de)| FeatureValueInfo {
                name: de.name.clone(),
                number: i + 1,
            })
            .collect(),
    }))
}

/// GET /languoid/genealogy - Families with their genera and languages
pub async fn genealogy(State(state): State<AppState>) -> Json<Vec<GenealogyFamily>> {
    let catalog = &state.catalog;

    let mut families: Vec<_> = catalog.families.iter().collect();
    families.sort_by(|a, b| a.id.cmp(&b.id));

    let tree = families
        .into_iter()
        .map(|family| GenealogyFamily {
            id: family.id.clone(),
            name: family.name.clone(),
            genera: catalog
                .genera_of(&family.id)
                .into_iter()
                .map(|genus| GenealogyGenus {
                    id: genus.id.clone(),
                    name: genus.name.clone(),
                    languages: catalog
                        .languages_of(&genus.id)
                        .into_iter()
                        .map(|l| GenealogyLanguage {
                            id: l.id.clone(),
                            name: l.name.clone(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    Json(tree)
}
