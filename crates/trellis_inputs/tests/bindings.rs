//! End-to-end binding invariants
//!
//! Exercises the engine the way a host runtime would: build cells, bind
//! inputs, commit edits from the presentation side, and observe cells,
//! widgets, and callbacks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use trellis_core::cell::{shared, CellGraph};
use trellis_core::{CellBind, CellType, CellValue, ColorValue, EnumShape, PaletteColor};
use trellis_inputs::inputs::{bool_input, color_input, number_input, select_input, text_input};
use trellis_inputs::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Light {
    Red,
    Green,
    Blue,
}

fn light_shape() -> EnumShape {
    static SHAPE: OnceLock<EnumShape> = OnceLock::new();
    SHAPE
        .get_or_init(|| EnumShape::new("Light", ["Red", "Green", "Blue"]))
        .clone()
}

impl CellBind for Light {
    fn cell_type() -> CellType {
        CellType::Enum(light_shape())
    }
    fn into_value(self) -> CellValue {
        CellValue::Enum {
            shape: light_shape(),
            index: self as usize,
        }
    }
    fn from_value(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Enum { shape, index } if *shape == light_shape() => {
                [Light::Red, Light::Green, Light::Blue].get(*index).copied()
            }
            _ => None,
        }
    }
}

#[test]
fn range_clamping_on_a_byte_cell() {
    let graph = shared(CellGraph::new());
    let cell = graph.lock().unwrap().create(7u8);
    let mut input = number_input(&cell).build(&graph).unwrap();

    input.commit(Some(999.0));
    assert_eq!(cell.typed::<u8>().unwrap().get(&graph.lock().unwrap()), Some(255));

    input.commit(Some(-5.0));
    assert_eq!(cell.typed::<u8>().unwrap().get(&graph.lock().unwrap()), Some(0));
}

#[test]
fn nullability_preservation_both_ways() {
    let graph = shared(CellGraph::new());

    // nullable: absent stays absent
    let opt = graph.lock().unwrap().create(Some(5i32));
    let mut input = number_input(&opt).build(&graph).unwrap();
    assert!(input.widget().nullable);
    input.commit(None);
    assert_eq!(graph.lock().unwrap().get(&opt), Some(CellValue::Absent));

    // non-nullable: the substituted default lands instead
    let plain = graph.lock().unwrap().create(5i32);
    let mut input = number_input(&plain).build(&graph).unwrap();
    assert!(!input.widget().nullable);
    input.commit(None);
    assert_eq!(graph.lock().unwrap().get(&plain), Some(CellValue::Int(0)));
    assert_eq!(input.widget().value, Some(0.0));
}

#[test]
fn validation_is_assigned_before_the_user_callback() {
    let graph = shared(CellGraph::new());
    let cell = graph.lock().unwrap().create(String::new());

    let observed: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let observed_in = observed.clone();

    let mut input = text_input(&cell)
        .email()
        .on_change(move |w| observed_in.lock().unwrap().push(w.invalid.clone()))
        .build(&graph)
        .unwrap();

    input.commit(Some("bad".into()));
    input.commit(Some("ok@example.com".into()));
    input.commit(Some("bad again".into()));

    let seen = observed.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].as_deref(), Some("not a valid email address"));
    assert_eq!(seen[1], None);
    assert_eq!(seen[2].as_deref(), Some("not a valid email address"));
}

#[test]
fn selection_round_trip_stores_the_case_not_the_label() {
    let graph = shared(CellGraph::new());
    let cell = graph.lock().unwrap().create(Light::Red);
    let mut input = select_input(&cell).build(&graph).unwrap();

    // derived set: exactly the declaration order
    let labels: Vec<_> = input.options().iter().map(|c| c.label.clone()).collect();
    assert_eq!(labels, ["Red", "Green", "Blue"]);

    let green = input.options().get(1).unwrap().value.clone();
    input.commit(Some(green));
    assert_eq!(
        cell.typed::<Light>().unwrap().get(&graph.lock().unwrap()),
        Some(Light::Green)
    );
}

#[test]
fn color_palette_property() {
    let graph = shared(CellGraph::new());

    // a text cell holding a palette name presents the pinned hex
    let text = graph.lock().unwrap().create(String::from("Red"));
    let input = color_input(&text).build(&graph).unwrap();
    assert_eq!(input.widget().value.as_deref(), Some("#dd5860"));

    // committing the hex into a palette cell stores the case, not the hex
    let palette = graph.lock().unwrap().create(PaletteColor::Green);
    let mut input = color_input(&palette).build(&graph).unwrap();
    input.commit(Some("#dd5860".into()));
    assert_eq!(
        graph.lock().unwrap().get(&palette),
        Some(CellValue::Color(ColorValue::Palette(PaletteColor::Red)))
    );
}

#[test]
fn idempotence_on_reachable_natives() {
    let graph = shared(CellGraph::new());

    // boolean over an int cell
    let flag = graph.lock().unwrap().create(0i64);
    let mut input = bool_input(&flag).build(&graph).unwrap();
    for x in [true, false] {
        input.commit(Some(x));
        assert_eq!(input.widget().value, Some(x));
    }

    // number over a float cell
    let level = graph.lock().unwrap().create(0.0f64);
    let mut input = number_input(&level).build(&graph).unwrap();
    for x in [0.0, -3.25, 1e9] {
        input.commit(Some(x));
        assert_eq!(input.widget().value, Some(x));
    }

    // text identity
    let name = graph.lock().unwrap().create(String::new());
    let mut input = text_input(&name).build(&graph).unwrap();
    for x in ["", "héllo", "multi\nline"] {
        input.commit(Some(x.to_string()));
        assert_eq!(input.widget().value.as_deref(), Some(x));
    }
}

#[test]
fn two_widgets_on_one_cell_resynchronize() {
    let graph = shared(CellGraph::new());
    let cell = graph.lock().unwrap().create(1i32);

    let mut first = number_input(&cell).build(&graph).unwrap();
    let mut second = number_input(&cell).build(&graph).unwrap();

    first.commit(Some(10.0));
    // the second widget still shows its seed until it re-reads
    assert_eq!(second.widget().value, Some(1.0));
    second.refresh();
    assert_eq!(second.widget().value, Some(10.0));

    // last write wins
    second.commit(Some(20.0));
    first.refresh();
    assert_eq!(first.widget().value, Some(20.0));
}

#[test]
fn watchers_observe_committed_writes() {
    let graph = shared(CellGraph::new());
    let cell = graph.lock().unwrap().create(false);

    let notified = Arc::new(AtomicUsize::new(0));
    let notified_in = notified.clone();
    graph.lock().unwrap().watch(
        &cell,
        Arc::new(move |_| {
            notified_in.fetch_add(1, Ordering::SeqCst);
        }),
    );

    let mut input = bool_input(&cell).build(&graph).unwrap();
    input.commit(Some(true));
    input.commit(Some(false));
    assert_eq!(notified.load(Ordering::SeqCst), 2);
}

#[test]
fn props_serialize_as_flat_records() {
    let graph = shared(CellGraph::new());
    let cell = graph.lock().unwrap().create(Some(128u8));
    let mut input = number_input(&cell).label("Level").build(&graph).unwrap();
    input.commit(Some(300.0));

    let json = serde_json::to_value(input.props()).unwrap();
    assert_eq!(json["kind"], "number");
    assert_eq!(json["value"], 255.0);
    assert_eq!(json["min"], 0.0);
    assert_eq!(json["max"], 255.0);
    assert_eq!(json["nullable"], true);
    assert_eq!(json["label"], "Level");
    // every field is a primitive or a list of primitives
    assert!(json.as_object().unwrap().values().all(|v| !v.is_object()));
}

#[test]
fn factory_round_trip_over_every_kind() {
    let graph = shared(CellGraph::new());

    let flag = graph.lock().unwrap().create(true);
    let count = graph.lock().unwrap().create(3u16);
    let name = graph.lock().unwrap().create(String::from("x"));
    let shade = graph.lock().unwrap().create(PaletteColor::Teal);
    let light = graph.lock().unwrap().create(Light::Blue);

    for (cell, kind) in [
        (&flag, InputKind::Bool(BoolVariant::Checkbox)),
        (&count, InputKind::Number(NumberVariant::Field)),
        (&name, InputKind::Text(TextVariant::SingleLine)),
        (&shade, InputKind::Color),
        (&light, InputKind::Select(SelectVariant::Dropdown)),
    ] {
        let input = create_input(&graph, cell, kind, KindOptions::default()).unwrap();
        assert_eq!(input.kind_name(), kind.name());
        assert_eq!(input.invalid(), None);
    }
}
