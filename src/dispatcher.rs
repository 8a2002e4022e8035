//! Typed publish/subscribe for viewer events.

use protvista_protocol::FeatureEvent;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Ready,
    FeatureSelected,
    FeatureDeselected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ViewerEvent {
    Ready,
    FeatureSelected(FeatureEvent),
    FeatureDeselected(FeatureEvent),
}

impl ViewerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready => EventKind::Ready,
            Self::FeatureSelected(_) => EventKind::FeatureSelected,
            Self::FeatureDeselected(_) => EventKind::FeatureDeselected,
        }
    }
}

type Handler = Box<dyn FnMut(&ViewerEvent)>;

/// Handlers run synchronously, in subscription order, on the caller's thread.
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<(EventKind, Handler)>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: EventKind, handler: impl FnMut(&ViewerEvent) + 'static) {
        self.handlers.push((kind, Box::new(handler)));
    }

    pub fn emit(&mut self, event: ViewerEvent) {
        let kind = event.kind();
        for (_, handler) in self.handlers.iter_mut().filter(|(k, _)| *k == kind) {
            handler(&event);
        }
    }

    pub fn ready(&mut self) {
        self.emit(ViewerEvent::Ready);
    }

    pub fn feature_selected(&mut self, payload: FeatureEvent) {
        self.emit(ViewerEvent::FeatureSelected(payload));
    }

    pub fn feature_deselected(&mut self, payload: FeatureEvent) {
        self.emit(ViewerEvent::FeatureDeselected(payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protvista_protocol::Feature;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_handlers_only_see_their_kind() {
        let seen = Rc::new(RefCell::new(vec![]));
        let mut dispatcher = Dispatcher::new();
        let sink = seen.clone();
        dispatcher.on(EventKind::FeatureSelected, move |e| {
            sink.borrow_mut().push(e.kind())
        });
        dispatcher.ready();
        dispatcher.feature_selected(FeatureEvent {
            feature: Rc::new(Feature::default()),
            color: "#fff".to_string(),
        });
        assert_eq!(*seen.borrow(), vec![EventKind::FeatureSelected]);
    }

    #[test]
    fn test_event_wire_shape() {
        let event = ViewerEvent::FeatureDeselected(FeatureEvent {
            feature: Rc::new(Feature::region(2, 5)),
            color: "red".to_string(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "featureDeselected");
        assert_eq!(json["payload"]["color"], "red");
        assert_eq!(json["payload"]["feature"]["begin"], 2);
    }
}
