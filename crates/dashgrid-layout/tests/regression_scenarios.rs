//! End-to-end layout scenarios carried over from the dashboard's layout
//! regression script.
//!
//! Run:
//!   cargo test -p dashgrid-layout --test regression_scenarios

use dashgrid_layout::{
    FULL_WIDTH_SPAN, LayoutDefaults, LayoutEngine, LayoutSnapshot, ModuleKey, Slot, SpanMap,
    compact, is_covered, normalize,
};

fn key(name: &str) -> Slot {
    Some(ModuleKey::new(name))
}

fn start() -> LayoutSnapshot {
    LayoutSnapshot::from_keys([Some("nutrition"), Some("productivity"), Some("fitness"), None])
}

fn assert_covered_cells_empty(snapshot: &LayoutSnapshot) {
    for index in 0..snapshot.layout.len() {
        if is_covered(&snapshot.layout, &snapshot.spans, index) {
            assert_eq!(
                snapshot.layout[index], None,
                "covered slot {index} holds a module in {snapshot:?}"
            );
        }
    }
}

#[test]
fn scenario_1_expanding_productivity() {
    let engine = LayoutEngine::default();
    let before = start();

    let after = engine.stretch(&before, 1);

    assert_eq!(after.layout[0], key("productivity"));
    assert!(is_covered(&after.layout, &after.spans, 1));
    assert_eq!(after.layout[1], None);
    assert_eq!(after.layout[2], key("nutrition"));
    assert_eq!(after.layout[3], key("fitness"));
    assert_eq!(after.spans.get("productivity"), Some(&FULL_WIDTH_SPAN));
    assert_eq!(after.module_count(), before.module_count());
    assert_eq!(after.module_count(), 3);
}

#[test]
fn scenario_2_removing_nutrition_after_expand() {
    let engine = LayoutEngine::default();
    let expanded = engine.stretch(&start(), 1);
    assert_eq!(expanded.layout[2], key("nutrition"));

    let after = engine.remove(&expanded, 2);

    assert_eq!(after.module_count(), expanded.module_count() - 1);
    assert_eq!(after.position_of("nutrition"), None);
    assert_eq!(after.spans.get("productivity"), Some(&FULL_WIDTH_SPAN));
    assert_covered_cells_empty(&after);
}

#[test]
fn scenario_3_covered_indices_hold_null() {
    let raw = start();
    let spans = SpanMap::from([(ModuleKey::new("nutrition"), FULL_WIDTH_SPAN)]);

    let out = compact(&raw.layout, &spans, &LayoutDefaults::default());

    assert_covered_cells_empty(&out);
    // "productivity" sat in the covered cell and is dropped by the scan.
    assert_eq!(out.position_of("productivity"), None);
    assert_eq!(out.layout[0], key("nutrition"));
}

#[test]
fn scenario_4_empty_input_normalizes_to_default() {
    let slots = normalize(&[], &LayoutDefaults::default());
    assert_eq!(
        slots,
        vec![key("nutrition"), key("productivity"), key("fitness"), None]
    );
}

#[test]
fn scenario_5_short_odd_input_pads_to_four() {
    let slots = normalize(&[key("a"), key("b"), key("c")], &LayoutDefaults::default());
    assert_eq!(slots.len(), 4);
    assert_eq!(slots, vec![key("a"), key("b"), key("c"), None]);
    assert_eq!(slots[3], None);
}

#[test]
fn expanding_another_module_collapses_the_first() {
    let engine = LayoutEngine::default();
    let first = engine.toggle_expand(&start(), 1);
    let fitness = first.position_of("fitness").expect("fitness placed");

    let second = engine.toggle_expand(&first, fitness);

    assert_eq!(second.spans.len(), 1);
    assert_eq!(second.spans.get("fitness"), Some(&FULL_WIDTH_SPAN));
    assert_eq!(second.spans.get("productivity"), None);
    assert_eq!(second.module_count(), 3);
    assert_covered_cells_empty(&second);
}

#[test]
fn drag_expanded_module_onto_neighbour() {
    let engine = LayoutEngine::default();
    let expanded = engine.stretch(&start(), 1);

    let swapped = engine.swap(&expanded, 0, 3);

    assert!(swapped.spans.is_empty());
    assert_eq!(swapped.module_count(), 3);
    assert_eq!(swapped.layout[0], key("fitness"));
}

#[test]
fn full_dashboard_session() {
    let engine = LayoutEngine::default();
    let mut snapshot = engine.default_snapshot();

    let pomodoro = snapshot
        .cells()
        .iter()
        .find(|cell| cell.is_empty())
        .map(|cell| cell.index)
        .expect("default layout has a free cell");
    snapshot = engine.add(&snapshot, pomodoro, ModuleKey::new("pomodoro"));
    assert_eq!(snapshot.position_of("pomodoro"), Some(pomodoro));

    // The grid is full now; appending grows it by a row.
    for module in engine.available_modules(&snapshot) {
        snapshot = engine.append(&snapshot, module);
    }
    assert!(engine.available_modules(&snapshot).is_empty());
    assert_eq!(snapshot.module_count(), 5);
    assert_eq!(snapshot.layout.len(), 6);

    let sleep = snapshot.position_of("sleep").expect("sleep placed");
    snapshot = engine.toggle_expand(&snapshot, sleep);
    assert_eq!(snapshot.module_count(), 5);
    assert!(snapshot.validate().is_ok());
    assert!(snapshot.is_canonical());
}
