//! Selection and highlight state for one viewer.
//!
//! At most one feature is selected and at most one standalone highlight is
//! shown. The selection always wins when the overlay is drawn. Features are
//! compared by identity (`Rc::ptr_eq`), so two equal-looking features from
//! different tracks stay distinct.

use crate::canvas::{ElementHandle, FeatureCanvas};
use crate::config::ViewerConfig;
use crate::dispatcher::Dispatcher;
use crate::highlight::{HighlightOverlay, HighlightShape};
use crate::pointer::{Gesture, PointerTracker};
use protvista_protocol::{Feature, FeatureEvent};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Selection {
    pub feature: Rc<Feature>,
    pub element: ElementHandle,
}

/// What the host should do with the feature tooltip after a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipAction {
    Open,
    Close,
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    config: ViewerConfig,
    selected: Option<Selection>,
    highlight: Option<Rc<Feature>>,
    over_feature: bool,
    pointer: PointerTracker,
}

impl SelectionController {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            config: config.clone(),
            selected: None,
            highlight: None,
            over_feature: false,
            pointer: PointerTracker::new(config.click_threshold_px),
        }
    }

    pub fn selected_feature(&self) -> Option<&Rc<Feature>> {
        self.selected.as_ref().map(|s| &s.feature)
    }

    pub fn selected_element(&self) -> Option<ElementHandle> {
        self.selected.as_ref().map(|s| s.element)
    }

    pub fn highlight(&self) -> Option<&Rc<Feature>> {
        self.highlight.as_ref()
    }

    pub fn is_over_feature(&self) -> bool {
        self.over_feature
    }

    pub fn overlay_for(&self, canvas: &dyn FeatureCanvas, feature: &Feature) -> HighlightOverlay {
        let aa_width = canvas.x_scale(2.0) - canvas.x_scale(1.0);
        let height = canvas
            .highlight_height()
            .unwrap_or(self.config.highlight_height);
        let continuous = feature
            .type_name()
            .is_some_and(|t| self.config.is_continuous_type(t));
        let shape = HighlightShape::for_feature(feature, aa_width, height, continuous);
        match feature.begin {
            Some(begin) if shape != HighlightShape::Hidden => HighlightOverlay {
                shape,
                translate: (canvas.x_scale(begin as f64), 0.0),
            },
            _ => HighlightOverlay::hidden(),
        }
    }

    /// Redraws the overlay for the selection, or else the standalone
    /// highlight. Does nothing when neither exists.
    pub fn update_highlight(&mut self, canvas: &mut dyn FeatureCanvas) {
        let feature = match (&self.selected, &self.highlight) {
            (Some(selection), _) => selection.feature.clone(),
            (None, Some(highlight)) => highlight.clone(),
            (None, None) => return,
        };
        let overlay = self.overlay_for(canvas, &feature);
        canvas.draw_highlight(&overlay);
        if self.highlight.is_some() {
            canvas.update_highlight_selector();
        }
    }

    pub fn reset_highlight(&mut self, canvas: &mut dyn FeatureCanvas) {
        self.highlight = None;
        canvas.draw_highlight(&HighlightOverlay::hidden());
        canvas.update_highlight_selector();
    }

    /// Shows a standalone highlight over `begin..=end`.
    pub fn highlight_region(&mut self, canvas: &mut dyn FeatureCanvas, begin: i64, end: i64) {
        self.highlight = Some(Rc::new(Feature::region(begin, end)));
        self.update_highlight(canvas);
    }

    /// Selects `feature`, or clears the selection when it is already the
    /// selected one.
    ///
    /// A previous selection is reported as deselected before a new
    /// selection is reported as selected.
    pub fn select_feature(
        &mut self,
        canvas: &mut dyn FeatureCanvas,
        dispatcher: &mut Dispatcher,
        feature: Rc<Feature>,
        element: ElementHandle,
    ) {
        self.highlight = None;
        let previous = self.selected.take();
        let toggled_off = previous
            .as_ref()
            .is_some_and(|p| Rc::ptr_eq(&p.feature, &feature));

        if toggled_off {
            self.reset_highlight(canvas);
        } else {
            self.selected = Some(Selection {
                feature: feature.clone(),
                element,
            });
            self.update_highlight(canvas);
        }

        let was_active = canvas.is_active(element);
        canvas.clear_active();
        canvas.set_active(element, !was_active);
        canvas.update_feature_selector();

        if let Some(previous) = &previous {
            dispatcher.feature_deselected(FeatureEvent {
                feature: previous.feature.clone(),
                color: canvas.fill_color(previous.element),
            });
        }
        if !toggled_off {
            if let Some(previous) = &previous {
                canvas.set_active(previous.element, false);
            }
            dispatcher.feature_selected(FeatureEvent {
                feature,
                color: canvas.fill_color(element),
            });
        }
    }

    /// Handles a click on a feature glyph. Hidden glyphs ignore clicks.
    pub fn click_feature(
        &mut self,
        canvas: &mut dyn FeatureCanvas,
        dispatcher: &mut Dispatcher,
        feature: Rc<Feature>,
        element: ElementHandle,
    ) -> Option<TooltipAction> {
        if canvas.is_hidden(element) {
            return None;
        }
        let action = if canvas.is_active(element) {
            TooltipAction::Close
        } else {
            TooltipAction::Open
        };
        self.select_feature(canvas, dispatcher, feature, element);
        Some(action)
    }

    pub fn pointer_over_feature(&mut self) {
        self.over_feature = true;
    }

    pub fn pointer_out_feature(&mut self) {
        self.over_feature = false;
    }

    pub fn container_pointer_down(&mut self, x: f64, y: f64) {
        self.pointer.press(x, y);
    }

    pub fn container_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer.move_to(x, y);
    }

    /// A click on empty track space runs `select_feature` again for the
    /// current selection.
    pub fn container_pointer_up(
        &mut self,
        canvas: &mut dyn FeatureCanvas,
        dispatcher: &mut Dispatcher,
        x: f64,
        y: f64,
    ) -> Option<Gesture> {
        let gesture = self.pointer.release(x, y);
        if gesture == Some(Gesture::Click) && !self.over_feature {
            if let Some(selection) = self.selected.clone() {
                self.select_feature(canvas, dispatcher, selection.feature, selection.element);
            }
        }
        gesture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::HeadlessCanvas;
    use crate::dispatcher::{EventKind, ViewerEvent};
    use std::cell::RefCell;

    type EventLog = Rc<RefCell<Vec<(EventKind, Option<i64>, String)>>>;

    fn recording_dispatcher() -> (Dispatcher, EventLog) {
        let log: EventLog = Rc::new(RefCell::new(vec![]));
        let mut dispatcher = Dispatcher::new();
        for kind in [EventKind::FeatureSelected, EventKind::FeatureDeselected] {
            let sink = log.clone();
            dispatcher.on(kind, move |event| match event {
                ViewerEvent::FeatureSelected(p) | ViewerEvent::FeatureDeselected(p) => {
                    sink.borrow_mut()
                        .push((event.kind(), p.feature.begin, p.color.clone()))
                }
                ViewerEvent::Ready => {}
            });
        }
        (dispatcher, log)
    }

    fn domain(begin: i64, end: i64) -> Rc<Feature> {
        Rc::new(Feature {
            feature_type: Some("DOMAIN".to_string()),
            begin: Some(begin),
            end: Some(end),
            ..Default::default()
        })
    }

    fn setup() -> (SelectionController, HeadlessCanvas, Dispatcher, EventLog) {
        let controller = SelectionController::new(&ViewerConfig::default());
        let mut canvas = HeadlessCanvas::new(100, 1000.0, 50.0);
        canvas.set_fill(ElementHandle(1), "#aa0000");
        canvas.set_fill(ElementHandle(2), "#00aa00");
        let (dispatcher, log) = recording_dispatcher();
        (controller, canvas, dispatcher, log)
    }

    #[test]
    fn test_select_then_toggle_off() {
        let (mut controller, mut canvas, mut dispatcher, log) = setup();
        let f1 = domain(10, 20);
        controller.select_feature(&mut canvas, &mut dispatcher, f1.clone(), ElementHandle(1));
        assert!(Rc::ptr_eq(controller.selected_feature().unwrap(), &f1));
        assert!(!canvas.overlay().is_hidden());
        assert_eq!(canvas.active_elements(), vec![ElementHandle(1)]);

        controller.select_feature(&mut canvas, &mut dispatcher, f1, ElementHandle(1));
        assert!(controller.selected_feature().is_none());
        assert!(canvas.overlay().is_hidden());
        assert!(canvas.active_elements().is_empty());
        assert_eq!(
            *log.borrow(),
            vec![
                (EventKind::FeatureSelected, Some(10), "#aa0000".to_string()),
                (EventKind::FeatureDeselected, Some(10), "#aa0000".to_string()),
            ]
        );
    }

    #[test]
    fn test_replacing_selection_deselects_first() {
        let (mut controller, mut canvas, mut dispatcher, log) = setup();
        controller.select_feature(&mut canvas, &mut dispatcher, domain(10, 20), ElementHandle(1));
        controller.select_feature(&mut canvas, &mut dispatcher, domain(30, 40), ElementHandle(2));
        assert_eq!(controller.selected_element(), Some(ElementHandle(2)));
        assert_eq!(canvas.active_elements(), vec![ElementHandle(2)]);
        assert_eq!(canvas.overlay().translate.0, canvas.x_scale(30.0));
        let kinds: Vec<_> = log.borrow().iter().map(|(k, b, _)| (*k, *b)).collect();
        assert_eq!(
            kinds,
            vec![
                (EventKind::FeatureSelected, Some(10)),
                (EventKind::FeatureDeselected, Some(10)),
                (EventKind::FeatureSelected, Some(30)),
            ]
        );
    }

    #[test]
    fn test_new_feature_on_same_element_leaves_it_inactive() {
        let (mut controller, mut canvas, mut dispatcher, log) = setup();
        controller.select_feature(&mut canvas, &mut dispatcher, domain(10, 20), ElementHandle(1));
        controller.select_feature(&mut canvas, &mut dispatcher, domain(30, 40), ElementHandle(1));
        assert_eq!(controller.selected_element(), Some(ElementHandle(1)));
        assert!(!canvas.is_active(ElementHandle(1)));

        // Host redraw dropped the active marker while a selection is held.
        canvas.clear_active();
        controller.select_feature(&mut canvas, &mut dispatcher, domain(50, 60), ElementHandle(1));
        assert!(!canvas.is_active(ElementHandle(1)));
        assert_eq!(controller.selected_feature().unwrap().begin, Some(50));
        assert_eq!(log.borrow().len(), 5);
        assert_eq!(canvas.feature_selector_updates(), 3);
    }

    #[test]
    fn test_equal_features_are_distinct_by_identity() {
        let (mut controller, mut canvas, mut dispatcher, _log) = setup();
        controller.select_feature(&mut canvas, &mut dispatcher, domain(10, 20), ElementHandle(1));
        controller.select_feature(&mut canvas, &mut dispatcher, domain(10, 20), ElementHandle(2));
        assert!(controller.selected_feature().is_some());
    }

    #[test]
    fn test_selection_overrides_region_highlight() {
        let (mut controller, mut canvas, mut dispatcher, _log) = setup();
        controller.highlight_region(&mut canvas, 50, 60);
        assert!(controller.highlight().is_some());
        assert_eq!(canvas.overlay().translate.0, canvas.x_scale(50.0));
        assert_eq!(canvas.highlight_selector_updates(), 1);

        controller.select_feature(&mut canvas, &mut dispatcher, domain(10, 20), ElementHandle(1));
        assert!(controller.highlight().is_none());
        assert_eq!(canvas.overlay().translate.0, canvas.x_scale(10.0));
    }

    #[test]
    fn test_reset_highlight() {
        let (mut controller, mut canvas, _dispatcher, _log) = setup();
        controller.highlight_region(&mut canvas, 5, 6);
        controller.reset_highlight(&mut canvas);
        assert!(controller.highlight().is_none());
        assert_eq!(canvas.overlay(), &HighlightOverlay::hidden());
    }

    #[test]
    fn test_discrete_type_gets_notched_overlay() {
        let (mut controller, mut canvas, mut dispatcher, _log) = setup();
        let bridge = Rc::new(Feature {
            feature_type: Some("disulfid".to_string()),
            begin: Some(4),
            end: Some(40),
            ..Default::default()
        });
        controller.select_feature(&mut canvas, &mut dispatcher, bridge, ElementHandle(1));
        assert_eq!(canvas.overlay().shape.points().len(), 8);
    }

    #[test]
    fn test_click_feature_tooltip_actions() {
        let (mut controller, mut canvas, mut dispatcher, _log) = setup();
        let f1 = domain(10, 20);
        let first = controller.click_feature(&mut canvas, &mut dispatcher, f1.clone(), ElementHandle(1));
        assert_eq!(first, Some(TooltipAction::Open));
        let second = controller.click_feature(&mut canvas, &mut dispatcher, f1, ElementHandle(1));
        assert_eq!(second, Some(TooltipAction::Close));

        canvas.set_hidden(ElementHandle(2), true);
        let hidden = controller.click_feature(&mut canvas, &mut dispatcher, domain(1, 2), ElementHandle(2));
        assert_eq!(hidden, None);
        assert!(controller.selected_feature().is_none());
    }

    #[test]
    fn test_background_click_reruns_selection() {
        let (mut controller, mut canvas, mut dispatcher, log) = setup();
        controller.select_feature(&mut canvas, &mut dispatcher, domain(10, 20), ElementHandle(1));
        controller.container_pointer_down(100.0, 20.0);
        let gesture = controller.container_pointer_up(&mut canvas, &mut dispatcher, 101.0, 20.0);
        assert_eq!(gesture, Some(Gesture::Click));
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(log.borrow()[1].0, EventKind::FeatureDeselected);
    }

    #[test]
    fn test_drag_or_hover_does_not_touch_selection() {
        let (mut controller, mut canvas, mut dispatcher, log) = setup();
        controller.select_feature(&mut canvas, &mut dispatcher, domain(10, 20), ElementHandle(1));

        controller.container_pointer_down(100.0, 20.0);
        controller.container_pointer_move(160.0, 20.0);
        let gesture = controller.container_pointer_up(&mut canvas, &mut dispatcher, 160.0, 20.0);
        assert_eq!(gesture, Some(Gesture::Drag));

        controller.pointer_over_feature();
        controller.container_pointer_down(100.0, 20.0);
        controller.container_pointer_up(&mut canvas, &mut dispatcher, 100.0, 20.0);
        controller.pointer_out_feature();

        assert_eq!(log.borrow().len(), 1);
        assert!(controller.selected_feature().is_some());
    }
}
