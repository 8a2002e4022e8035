//! Buckets features into category tracks in registry order.

use crate::error::{Result, ViewerError};
use crate::evidence::group_evidences_by_code;
use crate::positions::process_variants;
use crate::session::{CategoryRegistry, Session};
use indexmap::IndexMap;
use protvista_protocol::{
    CategoryDescriptor, CategoryTrack, Feature, PROTEOMICS_CATEGORY, VARIANTS_CATEGORY,
    VARIATION_CATEGORY,
};
use serde_json::Value;

/// Bucket for features that arrive without a category.
pub const UNCATEGORIZED: &str = "UNCATEGORIZED";

pub fn bucket_by_category(features: Vec<Feature>) -> IndexMap<String, Vec<Feature>> {
    let mut buckets: IndexMap<String, Vec<Feature>> = IndexMap::new();
    for feature in features {
        let key = feature
            .category_name()
            .unwrap_or(UNCATEGORIZED)
            .to_string();
        buckets.entry(key).or_default().push(feature);
    }
    buckets
}

/// Descriptors for every bucket the registry does not know yet.
fn unknown_categories<'a>(
    registry: &CategoryRegistry,
    names: impl Iterator<Item = &'a String>,
) -> Vec<CategoryDescriptor> {
    names
        .filter(|name| !registry.contains(name))
        .map(|name| CategoryRegistry::descriptor_for_unknown(name))
        .collect()
}

/// Groups features into `[category, features]` tracks following the
/// session's category order.
///
/// Variants from an external source are pulled out of the `VARIATION`
/// bucket, laid out by position and appended as the last track. Unknown
/// categories are registered with the session before ordering, so they
/// keep their place in later calls.
pub fn group_features_by_category(
    session: &mut Session,
    mut features: Vec<Feature>,
    sequence: Option<&str>,
    source: Option<&str>,
    include_variants: bool,
) -> Result<Vec<CategoryTrack>> {
    group_evidences_by_code(&mut features);
    let mut buckets = bucket_by_category(features);

    let variants = if session.is_external_source(source) && include_variants {
        buckets.shift_remove(VARIATION_CATEGORY)
    } else {
        buckets.shift_remove(VARIANTS_CATEGORY);
        None
    };

    let new_categories = unknown_categories(&session.categories, buckets.keys());
    if !new_categories.is_empty() {
        session.categories.add_categories(new_categories);
    }

    let mut tracks = Vec::with_capacity(buckets.len() + 1);
    for descriptor in session.categories.descriptors() {
        if let Some(features) = buckets.shift_remove(&descriptor.name) {
            tracks.push(CategoryTrack::features(descriptor.name.clone(), features));
        }
    }

    if let Some(variants) = variants {
        tracks.extend(process_variants(session, variants, sequence, source, true)?);
    }
    Ok(tracks)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Proteomics peptides become `unique` or `non_unique` by their `unique` flag.
pub fn process_proteomics(mut features: Vec<Feature>) -> Vec<CategoryTrack> {
    group_evidences_by_code(&mut features);
    for feature in features.iter_mut() {
        let unique = feature.extra.get("unique").is_some_and(is_truthy);
        feature.feature_type = Some(if unique { "unique" } else { "non_unique" }.to_string());
    }
    vec![CategoryTrack::features(PROTEOMICS_CATEGORY, features)]
}

/// One track named after the first feature's type.
pub fn process_ungrouped_features(mut features: Vec<Feature>) -> Result<Vec<CategoryTrack>> {
    group_evidences_by_code(&mut features);
    let name = features
        .first()
        .ok_or_else(|| ViewerError::invalid_input("Cannot build a track from an empty feature list"))?
        .type_name()
        .unwrap_or(UNCATEGORIZED)
        .to_string();
    Ok(vec![CategoryTrack::features(name, features)])
}
