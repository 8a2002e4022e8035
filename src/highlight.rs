//! Highlight overlay geometry.
//!
//! Continuous features get a plain box over their span. Discrete features
//! (bridges such as disulfide bonds) get a notched outline that frames only
//! the first and last residue, so neighbouring bridges of the same type stay
//! visually apart.

use protvista_protocol::Feature;
use svg::node::Value;
use svg::node::element::path::Data;

const HIDDEN_PATH: &str = "M-1,-1";

#[derive(Debug, Clone, PartialEq)]
pub enum HighlightShape {
    Hidden,
    Outline(Vec<(f32, f32)>),
}

impl HighlightShape {
    pub fn for_feature(feature: &Feature, aa_width: f64, height: f64, continuous: bool) -> Self {
        let (Some(_), Some(begin)) = (feature.type_name(), feature.begin) else {
            return Self::Hidden;
        };
        let span = match feature.end {
            Some(end) if end != 0 => end.saturating_sub(begin).saturating_add(1) as f64,
            _ => 1.0,
        };
        let aa = aa_width as f32;
        let gap = aa / 2.0;
        let width = (aa_width * span) as f32;
        let h = height as f32;
        let left = -gap;
        let right = -gap + width;
        let points = if continuous {
            vec![(left, 0.0), (right, 0.0), (right, h), (left, h)]
        } else {
            vec![
                (left, 0.0),
                (right, 0.0),
                (right, h),
                (right - aa, h),
                (right - aa, 0.0),
                (left + aa, 0.0),
                (left + aa, h),
                (left, h),
            ]
        };
        Self::Outline(points)
    }

    pub fn points(&self) -> &[(f32, f32)] {
        match self {
            Self::Hidden => &[],
            Self::Outline(points) => points,
        }
    }

    pub fn to_path_data(&self) -> String {
        let points = self.points();
        let Some(first) = points.first() else {
            return HIDDEN_PATH.to_string();
        };
        let mut data = Data::new().move_to(*first);
        for point in points.iter().skip(1) {
            data = data.line_to(*point);
        }
        Value::from(data.close()).to_string()
    }
}

/// Overlay path plus the translation that places it on the track.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightOverlay {
    pub shape: HighlightShape,
    pub translate: (f64, f64),
}

impl HighlightOverlay {
    pub fn hidden() -> Self {
        Self {
            shape: HighlightShape::Hidden,
            translate: (-1.0, -1.0),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.shape == HighlightShape::Hidden
    }

    pub fn path_data(&self) -> String {
        self.shape.to_path_data()
    }

    pub fn transform(&self) -> String {
        format!("translate({},{})", self.translate.0, self.translate.1)
    }
}
