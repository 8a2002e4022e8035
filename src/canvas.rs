//! The rendering seam used by the selection controller, and a headless
//! implementation of it.

use crate::highlight::HighlightOverlay;
use std::collections::{HashMap, HashSet};
use svg::Document;
use svg::node::element::{Path, Rectangle};

/// Opaque handle of a rendered feature glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub usize);

pub trait FeatureCanvas {
    /// Pixel offset of a 1-based residue position.
    fn x_scale(&self, position: f64) -> f64;
    fn highlight_height(&self) -> Option<f64>;
    fn is_active(&self, element: ElementHandle) -> bool;
    fn set_active(&mut self, element: ElementHandle, active: bool);
    fn clear_active(&mut self);
    fn is_hidden(&self, _element: ElementHandle) -> bool {
        false
    }
    fn fill_color(&self, element: ElementHandle) -> String;
    fn draw_highlight(&mut self, overlay: &HighlightOverlay);
    fn update_feature_selector(&mut self) {}
    fn update_highlight_selector(&mut self) {}
}

const DEFAULT_FILL: &str = "#000000";

/// Linear-scale canvas that keeps its state in memory and can export the
/// highlight overlay as SVG.
#[derive(Debug, Clone)]
pub struct HeadlessCanvas {
    pub px_per_residue: f64,
    pub offset: f64,
    pub width: f64,
    pub height: f64,
    fills: HashMap<ElementHandle, String>,
    hidden: HashSet<ElementHandle>,
    active: HashSet<ElementHandle>,
    overlay: HighlightOverlay,
    feature_selector_updates: usize,
    highlight_selector_updates: usize,
}

impl HeadlessCanvas {
    pub fn new(sequence_len: usize, width: f64, height: f64) -> Self {
        let px_per_residue = if sequence_len == 0 {
            width
        } else {
            width / sequence_len as f64
        };
        Self {
            px_per_residue,
            offset: 0.0,
            width,
            height,
            fills: HashMap::new(),
            hidden: HashSet::new(),
            active: HashSet::new(),
            overlay: HighlightOverlay::hidden(),
            feature_selector_updates: 0,
            highlight_selector_updates: 0,
        }
    }

    pub fn set_fill(&mut self, element: ElementHandle, color: &str) {
        self.fills.insert(element, color.to_string());
    }

    pub fn set_hidden(&mut self, element: ElementHandle, hidden: bool) {
        if hidden {
            self.hidden.insert(element);
        } else {
            self.hidden.remove(&element);
        }
    }

    pub fn active_elements(&self) -> Vec<ElementHandle> {
        let mut ret: Vec<_> = self.active.iter().copied().collect();
        ret.sort_by_key(|e| e.0);
        ret
    }

    pub fn overlay(&self) -> &HighlightOverlay {
        &self.overlay
    }

    pub fn feature_selector_updates(&self) -> usize {
        self.feature_selector_updates
    }

    pub fn highlight_selector_updates(&self) -> usize {
        self.highlight_selector_updates
    }

    pub fn to_svg(&self) -> String {
        let doc = Document::new()
            .set("viewBox", (0, 0, self.width, self.height))
            .set("width", self.width)
            .set("height", self.height)
            .add(
                Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", self.width)
                    .set("height", self.height)
                    .set("fill", "#ffffff"),
            )
            .add(
                Path::new()
                    .set("class", "up_pftv_highlight")
                    .set("d", self.overlay.path_data())
                    .set("transform", self.overlay.transform())
                    .set("fill", "#ffeb3b")
                    .set("fill-opacity", 0.4),
            );
        doc.to_string()
    }
}

impl FeatureCanvas for HeadlessCanvas {
    fn x_scale(&self, position: f64) -> f64 {
        self.offset + (position - 1.0) * self.px_per_residue
    }

    fn highlight_height(&self) -> Option<f64> {
        Some(self.height)
    }

    fn is_active(&self, element: ElementHandle) -> bool {
        self.active.contains(&element)
    }

    fn set_active(&mut self, element: ElementHandle, active: bool) {
        if active {
            self.active.insert(element);
        } else {
            self.active.remove(&element);
        }
    }

    fn clear_active(&mut self) {
        self.active.clear();
    }

    fn is_hidden(&self, element: ElementHandle) -> bool {
        self.hidden.contains(&element)
    }

    fn fill_color(&self, element: ElementHandle) -> String {
        self.fills
            .get(&element)
            .cloned()
            .unwrap_or_else(|| DEFAULT_FILL.to_string())
    }

    fn draw_highlight(&mut self, overlay: &HighlightOverlay) {
        self.overlay = overlay.clone();
    }

    fn update_feature_selector(&mut self) {
        self.feature_selector_updates += 1;
    }

    fn update_highlight_selector(&mut self) {
        self.highlight_selector_updates += 1;
    }
}
