//! Collapses per-feature evidence lists into code -> sources groups.

use indexmap::IndexMap;
use protvista_protocol::{Evidence, Evidences, Feature};
use serde_json::Value;

pub fn group_evidence_list(evidences: Vec<Evidence>) -> IndexMap<String, Vec<Value>> {
    let mut grouped: IndexMap<String, Vec<Value>> = IndexMap::new();
    for evidence in evidences {
        grouped
            .entry(evidence.code)
            .or_default()
            .push(evidence.source);
    }
    grouped
}

/// Groups evidences in place. Features already grouped, or without
/// evidences, are left alone, so running this twice is a no-op.
pub fn group_evidences_by_code(features: &mut [Feature]) {
    for feature in features.iter_mut() {
        if let Some(Evidences::List(list)) = &mut feature.evidences {
            let list = std::mem::take(list);
            feature.evidences = Some(Evidences::Grouped(group_evidence_list(list)));
        }
    }
}
