//! Adapts variant records from the variation API into the shape the
//! position layout expects.

use protvista_protocol::{Feature, UNKNOWN_ALTERNATIVE_SEQUENCE};
use tracing::warn;

const POLYPHEN: &str = "PolyPhen";
const SIFT: &str = "SIFT";

/// Lifts PolyPhen/SIFT predictions to top-level fields and defaults a
/// missing alternative sequence to `*`. The last matching prediction wins.
pub fn fix_variants(variants: &mut [Feature]) {
    for variant in variants.iter_mut() {
        if let Some(predictions) = &variant.predictions {
            for prediction in predictions {
                match prediction.pred_algorithm_name_type.as_deref() {
                    Some(POLYPHEN) => {
                        variant.polyphen_prediction = prediction.prediction_val_type.clone();
                        variant.polyphen_score = prediction.score;
                    }
                    Some(SIFT) => {
                        variant.sift_prediction = prediction.prediction_val_type.clone();
                        variant.sift_score = prediction.score;
                    }
                    _ => {}
                }
            }
        }

        if variant.alternative_sequence.is_none() {
            variant.alternative_sequence = Some(UNKNOWN_ALTERNATIVE_SEQUENCE.to_string());
            warn!(
                begin = ?variant.begin,
                end = ?variant.end,
                "Variant alternative sequence changed to * as no alternative sequence provided by the API"
            );
        }
    }
}
