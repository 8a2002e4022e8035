use protvista::canvas::{ElementHandle, FeatureCanvas, HeadlessCanvas};
use protvista::dispatcher::{EventKind, ViewerEvent};
use protvista::protocol::{CategoryTrack, Evidences, FeaturePayload};
use protvista::{ErrorCode, FeatureViewer, ViewerConfig};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;

fn payload(value: Value) -> FeaturePayload {
    serde_json::from_value(value).unwrap()
}

fn names(tracks: &[CategoryTrack]) -> Vec<&str> {
    tracks.iter().map(CategoryTrack::name).collect()
}

#[test]
fn test_external_source_payload_end_to_end() {
    let mut viewer = FeatureViewer::new(ViewerConfig::default());
    let tracks = viewer
        .load_features(
            payload(json!({
                "accession": "P05067",
                "sequence": "MKTAYIAK",
                "features": [
                    {"type": "HELIX", "category": "STRUCTURAL", "begin": 3, "end": 6},
                    {"type": "VARIANT", "category": "VARIATION", "begin": "2", "end": "2",
                     "alternativeSequence": "R", "sourceType": "LargeScaleStudy",
                     "consequence": "missense",
                     "evidences": [
                        {"code": "ECO:0000269", "source": {"name": "PubMed", "id": "1"}},
                        {"code": "ECO:0000269", "source": {"name": "PubMed", "id": "2"}}
                     ]},
                    {"type": "DOMAIN", "category": "DOMAINS_AND_SITES", "begin": 1, "end": 8}
                ]
            })),
            Some("cosmic"),
        )
        .unwrap();

    assert_eq!(
        names(&tracks),
        vec!["DOMAINS_AND_SITES", "STRUCTURAL", "VARIATION"]
    );
    let slots = tracks[2].position_slots().unwrap();
    assert_eq!(slots.len(), 10);
    let placed = slots[2].variants[0].as_external().unwrap();
    assert_eq!(placed.envelope.begin, Some(2));
    assert_eq!(placed.envelope.wild_type.as_deref(), Some("T"));
    assert_eq!(placed.envelope.source_type.as_deref(), Some("largescalestudy"));
    let inner = &placed.external_data["cosmic"];
    assert!(inner.category.is_none());
    assert_eq!(
        inner.evidences.as_ref().unwrap().sources("ECO:0000269").unwrap().len(),
        2
    );
    assert!(viewer.session().consequences.contains("missense"));
}

#[test]
fn test_canonical_source_keeps_variation_as_plain_track() {
    let mut viewer = FeatureViewer::new(ViewerConfig::default());
    let tracks = viewer
        .load_features(
            payload(json!({
                "sequence": "MKT",
                "features": [
                    {"type": "VARIANT", "category": "VARIATION", "begin": 2, "alternativeSequence": "A"},
                    {"type": "VARIANT", "category": "VARIANTS", "begin": 2, "alternativeSequence": "A"},
                    {"type": "CHAIN", "category": "MOLECULE_PROCESSING", "begin": 1, "end": 3}
                ]
            })),
            Some("uniprot"),
        )
        .unwrap();
    assert_eq!(names(&tracks), vec!["MOLECULE_PROCESSING", "VARIATION"]);
    assert!(tracks[1].feature_list().is_some());
}

#[test]
fn test_unknown_category_is_remembered_across_loads() {
    let mut viewer = FeatureViewer::new(ViewerConfig::default());
    let seeded = viewer.session().categories.len();
    let body = json!({
        "sequence": "MKT",
        "features": [
            {"type": "THING", "category": "NEW_THING", "begin": 1},
            {"type": "TOPO_DOM", "category": "TOPOLOGY", "begin": 1, "end": 2}
        ]
    });
    let first = viewer.load_features(payload(body.clone()), None).unwrap();
    let second = viewer.load_features(payload(body), None).unwrap();
    assert_eq!(viewer.session().categories.len(), seeded + 1);
    assert_eq!(
        viewer.session().categories.get("NEW_THING").unwrap().label,
        "New thing"
    );
    assert_eq!(names(&first), vec!["TOPOLOGY", "NEW_THING"]);
    assert_eq!(
        viewer.session().categories.names_in_order().last(),
        Some(&"NEW_THING")
    );
    assert_eq!(first, second);
}

#[test]
fn test_variants_without_sequence_are_rejected() {
    let mut viewer = FeatureViewer::new(ViewerConfig::default());
    let err = viewer
        .load_variants(
            payload(json!({"features": [{"type": "VARIANT", "begin": 1}]})),
            None,
        )
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[test]
fn test_variant_defaults_are_filled() {
    let mut viewer = FeatureViewer::new(ViewerConfig::default());
    let tracks = viewer
        .load_variants(
            payload(json!({
                "sequence": "MKT",
                "features": [{
                    "type": "VARIANT", "begin": 3,
                    "predictions": [
                        {"predAlgorithmNameType": "PolyPhen", "predictionValType": "benign", "score": 0.1},
                        {"predAlgorithmNameType": "SIFT", "predictionValType": "tolerated", "score": 0.8}
                    ],
                    "evidences": [{"code": "ECO:0000313", "source": {"name": "Ensembl"}}]
                }]
            })),
            None,
        )
        .unwrap();
    let slots = tracks[0].position_slots().unwrap();
    let variant = slots[3].variants[0].as_native().unwrap();
    assert_eq!(variant.alternative_sequence.as_deref(), Some("*"));
    assert_eq!(variant.polyphen_prediction.as_deref(), Some("benign"));
    assert_eq!(variant.sift_prediction.as_deref(), Some("tolerated"));
    assert!(matches!(variant.evidences, Some(Evidences::Grouped(_))));
}

#[test]
fn test_selection_flow_on_headless_canvas() {
    let mut viewer = FeatureViewer::new(ViewerConfig::default());
    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in [EventKind::FeatureSelected, EventKind::FeatureDeselected] {
        let sink = log.clone();
        viewer.on(kind, move |event: &ViewerEvent| {
            sink.borrow_mut().push(event.kind())
        });
    }

    let tracks = viewer
        .load_features(
            payload(json!({
                "sequence": "MKTAYIAKQR",
                "features": [
                    {"type": "DOMAIN", "category": "DOMAINS_AND_SITES", "begin": 2, "end": 5},
                    {"type": "DISULFID", "category": "PTM", "begin": 3, "end": 9}
                ]
            })),
            None,
        )
        .unwrap();
    let domain = Rc::new(tracks[0].feature_list().unwrap()[0].clone());
    let bridge = Rc::new(tracks[1].feature_list().unwrap()[0].clone());

    let mut canvas = HeadlessCanvas::new(10, 100.0, 20.0);
    viewer.select_feature(&mut canvas, domain.clone(), ElementHandle(1));
    assert_eq!(canvas.overlay().shape.points().len(), 4);
    assert_eq!(canvas.overlay().translate.0, canvas.x_scale(2.0));

    viewer.select_feature(&mut canvas, bridge, ElementHandle(2));
    assert_eq!(canvas.overlay().shape.points().len(), 8);
    assert_eq!(canvas.active_elements(), vec![ElementHandle(2)]);

    viewer.container_pointer_down(50.0, 5.0);
    viewer.container_pointer_up(&mut canvas, 50.0, 5.0);
    assert!(viewer.selection().selected_feature().is_none());
    assert!(canvas.overlay().is_hidden());
    assert!(canvas.to_svg().contains("M-1,-1"));

    assert_eq!(
        *log.borrow(),
        vec![
            EventKind::FeatureSelected,
            EventKind::FeatureDeselected,
            EventKind::FeatureSelected,
            EventKind::FeatureDeselected,
        ]
    );
}

#[test]
fn test_region_highlight_and_reset() {
    let mut viewer = FeatureViewer::new(ViewerConfig::default());
    let mut canvas = HeadlessCanvas::new(10, 100.0, 20.0);
    viewer.highlight_region(&mut canvas, 4, 6);
    assert!(!canvas.overlay().is_hidden());
    assert_eq!(canvas.overlay().translate.0, canvas.x_scale(4.0));
    viewer.reset_highlight(&mut canvas);
    assert!(canvas.overlay().is_hidden());
}

#[test]
fn test_tracks_serialize_as_pairs() {
    let mut viewer = FeatureViewer::new(ViewerConfig::default());
    let tracks = viewer
        .load_proteomics(payload(json!({
            "features": [
                {"type": "PEPTIDE", "begin": 1, "end": 4, "unique": true},
                {"type": "PEPTIDE", "begin": 2, "end": 5, "unique": false}
            ]
        })));
    let value = serde_json::to_value(&tracks).unwrap();
    assert_eq!(value[0][0], "PROTEOMICS");
    assert_eq!(value[0][1][0]["type"], "unique");
    assert_eq!(value[0][1][1]["type"], "non_unique");
}
