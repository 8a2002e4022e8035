//! One viewer instance: its session registries, event dispatcher and
//! selection state.

use crate::canvas::{ElementHandle, FeatureCanvas};
use crate::categories::{group_features_by_category, process_proteomics};
use crate::config::ViewerConfig;
use crate::dispatcher::{Dispatcher, EventKind, ViewerEvent};
use crate::error::Result;
use crate::fetch::PayloadSource;
use crate::pointer::Gesture;
use crate::positions::process_variants;
use crate::selection::{SelectionController, TooltipAction};
use crate::session::Session;
use protvista_protocol::{CategoryTrack, Feature, FeaturePayload};
use std::rc::Rc;

#[derive(Debug)]
pub struct FeatureViewer {
    session: Session,
    dispatcher: Dispatcher,
    selection: SelectionController,
}

impl FeatureViewer {
    pub fn new(config: ViewerConfig) -> Self {
        let selection = SelectionController::new(&config);
        Self {
            session: Session::init(config),
            dispatcher: Dispatcher::new(),
            selection,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn on(&mut self, kind: EventKind, handler: impl FnMut(&ViewerEvent) + 'static) {
        self.dispatcher.on(kind, handler);
    }

    /// Drops registered categories, consequence types and the selection.
    pub fn reset(&mut self) {
        self.session.reset();
        self.selection = SelectionController::new(self.session.config());
    }

    /// Builds the ordered tracks for a feature payload and signals `ready`.
    pub fn load_features(
        &mut self,
        payload: FeaturePayload,
        source: Option<&str>,
    ) -> Result<Vec<CategoryTrack>> {
        let include_variants = self.session.config().include_variants;
        let tracks = group_features_by_category(
            &mut self.session,
            payload.features,
            payload.sequence.as_deref(),
            source,
            include_variants,
        )?;
        self.dispatcher.ready();
        Ok(tracks)
    }

    pub fn load_variants(
        &mut self,
        payload: FeaturePayload,
        source: Option<&str>,
    ) -> Result<Vec<CategoryTrack>> {
        let tracks = process_variants(
            &mut self.session,
            payload.features,
            payload.sequence.as_deref(),
            source,
            false,
        )?;
        self.dispatcher.ready();
        Ok(tracks)
    }

    pub fn load_proteomics(&mut self, payload: FeaturePayload) -> Vec<CategoryTrack> {
        let tracks = process_proteomics(payload.features);
        self.dispatcher.ready();
        tracks
    }

    pub fn fetch_features(
        &mut self,
        fetcher: &dyn PayloadSource,
        url: &str,
        source: Option<&str>,
    ) -> Result<Vec<CategoryTrack>> {
        let payload: FeaturePayload = serde_json::from_value(fetcher.get(url)?)?;
        self.load_features(payload, source)
    }

    pub fn select_feature(
        &mut self,
        canvas: &mut dyn FeatureCanvas,
        feature: Rc<Feature>,
        element: ElementHandle,
    ) {
        self.selection
            .select_feature(canvas, &mut self.dispatcher, feature, element);
    }

    pub fn click_feature(
        &mut self,
        canvas: &mut dyn FeatureCanvas,
        feature: Rc<Feature>,
        element: ElementHandle,
    ) -> Option<TooltipAction> {
        self.selection
            .click_feature(canvas, &mut self.dispatcher, feature, element)
    }

    pub fn highlight_region(&mut self, canvas: &mut dyn FeatureCanvas, begin: i64, end: i64) {
        self.selection.highlight_region(canvas, begin, end);
    }

    pub fn reset_highlight(&mut self, canvas: &mut dyn FeatureCanvas) {
        self.selection.reset_highlight(canvas);
    }

    pub fn pointer_over_feature(&mut self) {
        self.selection.pointer_over_feature();
    }

    pub fn pointer_out_feature(&mut self) {
        self.selection.pointer_out_feature();
    }

    pub fn container_pointer_down(&mut self, x: f64, y: f64) {
        self.selection.container_pointer_down(x, y);
    }

    pub fn container_pointer_move(&mut self, x: f64, y: f64) {
        self.selection.container_pointer_move(x, y);
    }

    pub fn container_pointer_up(
        &mut self,
        canvas: &mut dyn FeatureCanvas,
        x: f64,
        y: f64,
    ) -> Option<Gesture> {
        self.selection
            .container_pointer_up(canvas, &mut self.dispatcher, x, y)
    }
}
