use egui::Color32;
use map_annotator::map::{LatLng, LatLngBounds};
use map_annotator::shape::{Circle, Marker, Polygon, Polyline, Rectangle};
use map_annotator::state::{ID_KEY, SHAPES_KEY};
use map_annotator::{
    ControllerError, KeyValueStore, MapConfig, MapController, MapEvent, MemoryStore, Shape, ShapeKind, ShapeLayer,
    ShapeStyle, StyleState,
};

fn dhaka() -> LatLng {
    LatLng::new(23.81, 90.41)
}

fn fresh(store: &MemoryStore) -> MapController {
    MapController::initialize(MapConfig::default(), store)
}

fn sample_layer(kind: ShapeKind) -> ShapeLayer {
    let style = ShapeStyle::default();
    let c = dhaka();
    match kind {
        ShapeKind::Circle => Circle::new(c, 150.0, style).into(),
        ShapeKind::Marker => Marker::new(c, style).into(),
        ShapeKind::Rectangle => Rectangle::new(LatLngBounds::from_corners(c, c.offset(0.01, 0.01)), style).into(),
        ShapeKind::Polygon => Polygon::new(vec![c, c.offset(0.01, 0.0), c.offset(0.0, 0.01)], style).into(),
        ShapeKind::Polyline => Polyline::new(vec![c, c.offset(0.01, 0.02)], style).into(),
    }
}

#[test]
fn test_circle_scenario_survives_reload() {
    let mut store = MemoryStore::new();
    let mut controller = fresh(&store);
    controller.update_style(StyleState::new(
        Color32::from_rgb(0xff, 0x00, 0x00),
        Color32::from_rgb(0xff, 0x66, 0x66),
    ));
    controller.on_shape_created(sample_layer(ShapeKind::Circle), ShapeKind::Circle);
    controller.save_shapes(&mut store).unwrap();

    let reloaded = fresh(&store);
    assert_eq!(reloaded.shapes().len(), 1);
    let properties = &reloaded.shapes()[0].properties;
    assert_eq!(properties.shape_type.as_deref(), Some("circle"));
    assert_eq!(properties.radius, Some(150.0));
    assert_eq!(properties.stroke_color.as_deref(), Some("#ff0000"));
    assert_eq!(properties.fill_color.as_deref(), Some("#ff6666"));

    let id = reloaded.shapes()[0].shape_id.unwrap();
    let layer = reloaded.layer(id).unwrap();
    assert_eq!(layer.kind(), ShapeKind::Circle);
    assert_eq!(layer.radius(), Some(150.0));
}

#[test]
fn test_every_kind_round_trips() {
    let mut store = MemoryStore::new();
    let mut controller = fresh(&store);
    for kind in ShapeKind::ALL {
        controller.on_shape_created(sample_layer(kind), kind);
    }
    controller.save_shapes(&mut store).unwrap();

    let reloaded = fresh(&store);
    let mut kinds: Vec<ShapeKind> = reloaded.layers().iter().map(|(_, entry)| entry.layer.kind()).collect();
    kinds.sort();
    let mut expected = ShapeKind::ALL.to_vec();
    expected.sort();
    assert_eq!(kinds, expected);
}

#[test]
fn test_ids_increase_across_reload() {
    let mut store = MemoryStore::new();
    let mut controller = fresh(&store);
    let first: Vec<u64> = (0..3)
        .map(|_| controller.on_shape_created(sample_layer(ShapeKind::Marker), ShapeKind::Marker))
        .collect();
    assert_eq!(first, vec![1, 2, 3]);
    controller.save_shapes(&mut store).unwrap();
    assert_eq!(store.get_string(ID_KEY).as_deref(), Some("4"));

    // Deleted ids are never handed out again.
    controller.delete_shape(2).unwrap();
    controller.save_shapes(&mut store).unwrap();

    let mut reloaded = fresh(&store);
    let next = reloaded.on_shape_created(sample_layer(ShapeKind::Circle), ShapeKind::Circle);
    assert_eq!(next, 4);
}

#[test]
fn test_edit_is_exclusive() {
    let mut store = MemoryStore::new();
    let mut controller = fresh(&store);
    for kind in [ShapeKind::Polygon, ShapeKind::Rectangle, ShapeKind::Circle] {
        controller.on_shape_created(sample_layer(kind), kind);
    }
    controller.save_shapes(&mut store).unwrap();

    controller.edit_shape(0).unwrap();
    let target = controller.edit_shape(2).unwrap();

    for (id, entry) in controller.layers().iter() {
        assert_eq!(entry.is_editing(), id == target, "layer {id}");
    }
    assert_eq!(controller.editing_layer(), Some(target));

    controller.stop_editing();
    assert_eq!(controller.editing_layer(), None);
}

#[test]
fn test_delete_removes_exactly_one_entry() {
    let mut store = MemoryStore::new();
    let mut controller = fresh(&store);
    for kind in [ShapeKind::Marker, ShapeKind::Polyline, ShapeKind::Circle] {
        controller.on_shape_created(sample_layer(kind), kind);
    }
    controller.save_shapes(&mut store).unwrap();
    let before = controller.shapes().to_vec();

    let removed = controller.delete_shape(1).unwrap();
    assert_eq!(removed, before[1]);
    assert_eq!(controller.shapes().len(), 2);
    assert_eq!(controller.shapes()[0], before[0]);
    assert_eq!(controller.shapes()[1], before[2]);
    assert!(controller.layer(before[1].shape_id.unwrap()).is_none());
    assert_eq!(controller.layers().len(), 2);

    // Not persisted until the next save.
    assert_eq!(fresh(&store).shapes().len(), 3);
    controller.save_shapes(&mut store).unwrap();
    assert_eq!(fresh(&store).shapes().len(), 2);
}

#[test]
fn test_lookup_miss_leaves_state_alone() {
    let mut store = MemoryStore::new();
    let mut controller = fresh(&store);
    controller.on_shape_created(sample_layer(ShapeKind::Circle), ShapeKind::Circle);
    controller.save_shapes(&mut store).unwrap();

    assert_eq!(
        controller.edit_shape(5),
        Err(ControllerError::IndexOutOfRange { index: 5, len: 1 })
    );
    assert_eq!(
        controller.delete_shape(1),
        Err(ControllerError::IndexOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(controller.shapes().len(), 1);
    assert_eq!(controller.layers().len(), 1);
    assert!(controller.dispatch(MapEvent::EditRequested { index: 9 }, &mut store).is_err());
    assert_eq!(controller.editing_layer(), None);
}

#[test]
fn test_style_change_only_affects_new_shapes() {
    let mut store = MemoryStore::new();
    let mut controller = fresh(&store);
    let old = controller.on_shape_created(sample_layer(ShapeKind::Polygon), ShapeKind::Polygon);

    let blue = StyleState::new(Color32::from_rgb(0, 0, 255), Color32::from_rgb(0, 0, 128));
    controller
        .dispatch(MapEvent::StyleChanged(blue), &mut store)
        .unwrap();
    let new = controller.on_shape_created(sample_layer(ShapeKind::Polygon), ShapeKind::Polygon);

    assert_eq!(controller.layer(old).unwrap().style().stroke_color, Color32::from_rgb(0xff, 0, 0));
    assert_eq!(controller.layer(new).unwrap().style().stroke_color, blue.stroke_color);
    assert_eq!(controller.layer(new).unwrap().style().fill_color, blue.fill_color);
}

#[test]
fn test_bulk_delete_persists_immediately() {
    let mut store = MemoryStore::new();
    let mut controller = fresh(&store);
    let a = controller.on_shape_created(sample_layer(ShapeKind::Marker), ShapeKind::Marker);
    let b = controller.on_shape_created(sample_layer(ShapeKind::Circle), ShapeKind::Circle);
    controller.save_shapes(&mut store).unwrap();

    controller
        .dispatch(MapEvent::ShapesDeleted { ids: vec![a] }, &mut store)
        .unwrap();
    let reloaded = fresh(&store);
    assert_eq!(reloaded.shapes().len(), 1);
    assert_eq!(reloaded.shapes()[0].shape_id, Some(b));
}

#[test]
fn test_edited_geometry_is_saved() {
    let mut store = MemoryStore::new();
    let mut controller = fresh(&store);
    let id = controller.on_shape_created(sample_layer(ShapeKind::Circle), ShapeKind::Circle);
    controller.save_shapes(&mut store).unwrap();

    controller.edit_shape(0).unwrap();
    let layer = controller.layer_mut(id).unwrap();
    let east = dhaka().east_by(400.0);
    layer.move_handle(1, east);
    controller.save_shapes(&mut store).unwrap();

    let radius = fresh(&store).shapes()[0].properties.radius.unwrap();
    assert!((radius - 400.0).abs() < 1.0, "{radius}");
}

#[test]
fn test_malformed_store_starts_empty() {
    let mut store = MemoryStore::new();
    store.set_string(SHAPES_KEY, "[1, 2, 3]".to_string());
    store.set_string(ID_KEY, "seven".to_string());

    let mut controller = fresh(&store);
    assert!(controller.shapes().is_empty());
    assert_eq!(controller.on_shape_created(sample_layer(ShapeKind::Marker), ShapeKind::Marker), 1);
}

#[test]
fn test_ids_at_the_limit_are_treated_as_malformed() {
    let mut store = MemoryStore::new();
    store.set_string(ID_KEY, u64::MAX.to_string());
    store.set_string(
        SHAPES_KEY,
        format!(
            r#"{{ "type": "FeatureCollection", "features": [
                {{ "type": "Feature", "geometry": {{ "type": "Point", "coordinates": [90.41, 23.81] }},
                   "properties": {{ "shapeType": "marker" }}, "ShapeId": {} }} ] }}"#,
            u64::MAX
        ),
    );

    let mut controller = fresh(&store);
    assert_eq!(controller.shapes().len(), 1);
    let stored = controller.shapes()[0].shape_id.unwrap();
    assert!(stored < u64::MAX);

    let drawn = controller.on_shape_created(sample_layer(ShapeKind::Circle), ShapeKind::Circle);
    assert!(drawn > stored);
    controller.save_shapes(&mut store).unwrap();
    assert_eq!(fresh(&store).shapes().len(), 2);
}
