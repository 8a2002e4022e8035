//! Shared machine-readable contracts for protein feature tracks.
//!
//! The field names on the wire follow the upstream feature and variation
//! APIs (`wildType`, `alternativeSequence`, `externalData`, ...), so payloads
//! can be decoded as they arrive and tracks can be handed to a renderer as-is.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::rc::Rc;

pub const VARIATION_CATEGORY: &str = "VARIATION";
pub const VARIANTS_CATEGORY: &str = "VARIANTS";
pub const PROTEOMICS_CATEGORY: &str = "PROTEOMICS";
pub const VARIANT_SLOT_TYPE: &str = "VARIANT";
pub const DELETION_RESIDUE: &str = "del";
pub const UNKNOWN_ALTERNATIVE_SEQUENCE: &str = "*";

/// Accepts integers, floats and numeric strings; anything else decodes as absent.
fn lenient_position<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(position_from_value))
}

pub fn position_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Records without a code are grouped under the empty code.
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub source: Value,
}

/// Evidence list as delivered upstream, or grouped by evidence code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Evidences {
    List(Vec<Evidence>),
    Grouped(IndexMap<String, Vec<Value>>),
}

impl Evidences {
    pub fn is_grouped(&self) -> bool {
        matches!(self, Self::Grouped(_))
    }

    pub fn sources(&self, code: &str) -> Option<&[Value]> {
        match self {
            Self::Grouped(map) => map.get(code).map(Vec::as_slice),
            Self::List(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pred_algorithm_name_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_val_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An annotated region or point on a protein sequence.
///
/// Variant-only fields stay `None` for other feature kinds. Fields the
/// pipeline does not interpret are carried through `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_position",
        skip_serializing_if = "Option::is_none"
    )]
    pub begin: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_position",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidences: Option<Evidences>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wild_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_sequence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consequence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictions: Option<Vec<Prediction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyphen_prediction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyphen_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sift_prediction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sift_score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Feature {
    /// A synthetic continuous feature spanning `begin..=end`, used for
    /// host-driven region highlights.
    pub fn region(begin: i64, end: i64) -> Self {
        Self {
            feature_type: Some("CONTINUOUS".to_string()),
            begin: Some(begin),
            end: Some(end),
            ..Default::default()
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        self.feature_type.as_deref()
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationType {
    Basic,
    Variant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    pub name: String,
    pub label: String,
    #[serde(rename = "visualizationType")]
    pub visualization_type: VisualizationType,
}

/// Fields kept at the top level when a variant from a non-canonical source
/// is placed on a position slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantEnvelope {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_position",
        skip_serializing_if = "Option::is_none"
    )]
    pub begin: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_position",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wild_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_sequence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalVariant {
    #[serde(flatten)]
    pub envelope: VariantEnvelope,
    #[serde(rename = "externalData")]
    pub external_data: BTreeMap<String, Feature>,
}

/// A variant as stored on a position slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlacedVariant {
    External(ExternalVariant),
    Native(Feature),
}

impl PlacedVariant {
    pub fn begin(&self) -> Option<i64> {
        match self {
            Self::External(v) => v.envelope.begin,
            Self::Native(f) => f.begin,
        }
    }

    pub fn alternative_sequence(&self) -> Option<&str> {
        match self {
            Self::External(v) => v.envelope.alternative_sequence.as_deref(),
            Self::Native(f) => f.alternative_sequence.as_deref(),
        }
    }

    pub fn as_native(&self) -> Option<&Feature> {
        match self {
            Self::Native(f) => Some(f),
            Self::External(_) => None,
        }
    }

    pub fn as_external(&self) -> Option<&ExternalVariant> {
        match self {
            Self::External(v) => Some(v),
            Self::Native(_) => None,
        }
    }
}

/// One residue (or boundary deletion sentinel) of the variant layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSlot {
    #[serde(rename = "type")]
    pub slot_type: String,
    pub normal: String,
    pub pos: usize,
    pub variants: Vec<PlacedVariant>,
}

impl PositionSlot {
    pub fn residue(pos: usize, normal: impl Into<String>) -> Self {
        Self {
            slot_type: VARIANT_SLOT_TYPE.to_string(),
            normal: normal.into(),
            pos,
            variants: vec![],
        }
    }

    pub fn deletion(pos: usize) -> Self {
        Self::residue(pos, DELETION_RESIDUE)
    }

    pub fn is_deletion_sentinel(&self) -> bool {
        self.normal == DELETION_RESIDUE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackData {
    Positions(Vec<PositionSlot>),
    Features(Vec<Feature>),
}

/// A `[category, data]` pair, serialized as a two-element JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTrack(pub String, pub TrackData);

impl CategoryTrack {
    pub fn features(name: impl Into<String>, features: Vec<Feature>) -> Self {
        Self(name.into(), TrackData::Features(features))
    }

    pub fn positions(name: impl Into<String>, slots: Vec<PositionSlot>) -> Self {
        Self(name.into(), TrackData::Positions(slots))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn feature_list(&self) -> Option<&[Feature]> {
        match &self.1 {
            TrackData::Features(features) => Some(features),
            TrackData::Positions(_) => None,
        }
    }

    pub fn position_slots(&self) -> Option<&[PositionSlot]> {
        match &self.1 {
            TrackData::Positions(slots) => Some(slots),
            TrackData::Features(_) => None,
        }
    }
}

/// Feature list payload as returned by the feature and variation APIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of `featureSelected` and `featureDeselected`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEvent {
    pub feature: Rc<Feature>,
    pub color: String,
}
