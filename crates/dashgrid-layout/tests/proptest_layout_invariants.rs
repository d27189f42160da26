//! Property-based invariants for the layout engine.
//!
//! Random raw inputs and random operation streams are pushed through the
//! public `LayoutEngine` API; after every step the snapshot must be canonical.
//!
//! Run:
//!   cargo test -p dashgrid-layout --test proptest_layout_invariants

use std::collections::BTreeSet;

use dashgrid_layout::{
    FULL_WIDTH_SPAN, LayoutDefaults, LayoutEngine, LayoutOperation, LayoutSnapshot, MIN_SLOTS,
    ModuleKey, Slot, SpanMap, compact, is_covered,
};
use proptest::prelude::*;

const KEYS: [&str; 6] = ["nutrition", "productivity", "fitness", "pomodoro", "sleep", "notes"];

fn slot_strategy() -> impl Strategy<Value = Slot> {
    prop_oneof![
        1 => Just(None),
        3 => (0..KEYS.len()).prop_map(|i| Some(ModuleKey::new(KEYS[i]))),
    ]
}

fn slots_strategy() -> impl Strategy<Value = Vec<Slot>> {
    prop::collection::vec(slot_strategy(), 0..14)
}

fn spans_strategy() -> impl Strategy<Value = SpanMap> {
    prop::collection::btree_map(
        (0..KEYS.len()).prop_map(|i| ModuleKey::new(KEYS[i])),
        prop_oneof![Just(FULL_WIDTH_SPAN), Just(1u8), Just(3u8)],
        0..4,
    )
}

fn snapshot_strategy() -> impl Strategy<Value = LayoutSnapshot> {
    (slots_strategy(), spans_strategy())
        .prop_map(|(slots, spans)| compact(&slots, &spans, &LayoutDefaults::default()))
}

fn operation_strategy() -> impl Strategy<Value = LayoutOperation> {
    let index = 0usize..16;
    let module = (0..KEYS.len()).prop_map(|i| ModuleKey::new(KEYS[i]));
    prop_oneof![
        index.clone().prop_map(|index| LayoutOperation::ToggleExpand { index }),
        (index.clone(), module.clone())
            .prop_map(|(index, module)| LayoutOperation::Add { index, module }),
        module.prop_map(|module| LayoutOperation::Append { module }),
        index.clone().prop_map(|index| LayoutOperation::Remove { index }),
        (index.clone(), index).prop_map(|(source, target)| LayoutOperation::Swap { source, target }),
        Just(LayoutOperation::Compact),
    ]
}

fn assert_canonical(snapshot: &LayoutSnapshot) -> Result<(), TestCaseError> {
    let len = snapshot.layout.len();
    prop_assert!(len >= MIN_SLOTS, "too short: {snapshot:?}");
    prop_assert_eq!(len % 2, 0, "odd length: {:?}", snapshot);

    let mut seen = BTreeSet::new();
    for key in snapshot.layout.iter().flatten() {
        prop_assert!(seen.insert(key.clone()), "duplicate {key} in {snapshot:?}");
    }

    for (key, span) in &snapshot.spans {
        prop_assert_eq!(*span, FULL_WIDTH_SPAN);
        let position = snapshot.position_of(key.as_str());
        prop_assert!(position.is_some(), "stale span for {key}");
        prop_assert_eq!(position.map(|p| p % 2), Some(0), "span on right column");
    }

    for index in 0..len {
        if is_covered(&snapshot.layout, &snapshot.spans, index) {
            prop_assert_eq!(&snapshot.layout[index], &None, "covered slot {} occupied", index);
        }
    }

    prop_assert!(snapshot.invariant_report().issues.is_empty());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn compact_output_is_canonical(slots in slots_strategy(), spans in spans_strategy()) {
        let out = compact(&slots, &spans, &LayoutDefaults::default());
        assert_canonical(&out)?;
    }

    #[test]
    fn compact_is_idempotent(snapshot in snapshot_strategy()) {
        let again = compact(&snapshot.layout, &snapshot.spans, &LayoutDefaults::default());
        prop_assert_eq!(again, snapshot);
    }

    #[test]
    fn compact_never_invents_modules(slots in slots_strategy(), spans in spans_strategy()) {
        let out = compact(&slots, &spans, &LayoutDefaults::default());
        if !slots.is_empty() {
            for key in out.layout.iter().flatten() {
                prop_assert!(slots.contains(&Some(key.clone())), "{key} was not in input");
            }
        }
    }

    #[test]
    fn random_operation_streams_stay_canonical(
        snapshot in snapshot_strategy(),
        ops in prop::collection::vec(operation_strategy(), 1..24),
    ) {
        let engine = LayoutEngine::default();
        let mut current = snapshot;
        for op in ops {
            let outcome = engine.apply(&current, op.clone());
            assert_canonical(&outcome.snapshot)?;
            prop_assert_eq!(outcome.changed, outcome.snapshot != current, "op {}", op.name());
            current = outcome.snapshot;
        }
    }

    #[test]
    fn replay_matches_stepwise_apply(
        snapshot in snapshot_strategy(),
        ops in prop::collection::vec(operation_strategy(), 0..16),
    ) {
        let engine = LayoutEngine::default();
        let stepwise = ops.iter().cloned().fold(snapshot.clone(), |current, op| {
            engine.apply(&current, op).snapshot
        });
        prop_assert_eq!(engine.replay(&snapshot, ops), stepwise);
    }

    #[test]
    fn stretch_preserves_module_count(snapshot in snapshot_strategy(), index in 0usize..16) {
        let engine = LayoutEngine::default();
        let out = engine.stretch(&snapshot, index);
        prop_assert_eq!(out.module_count(), snapshot.module_count());
        if let Some(key) = snapshot.module_at(index) {
            prop_assert_eq!(out.spans.len(), 1);
            prop_assert_eq!(out.span(key), FULL_WIDTH_SPAN);
        }
    }

    #[test]
    fn remove_drops_at_most_one_module(snapshot in snapshot_strategy(), index in 0usize..16) {
        let engine = LayoutEngine::default();
        let out = engine.remove(&snapshot, index);
        let removed = snapshot.module_count() - out.module_count();
        prop_assert!(removed <= 1);
        if let Some(key) = snapshot.module_at(index) {
            prop_assert_eq!(removed, 1);
            prop_assert_eq!(out.position_of(key.as_str()), None);
            prop_assert!(!out.spans.contains_key(key.as_str()));
        }
    }

    #[test]
    fn swap_preserves_module_set(
        snapshot in snapshot_strategy(),
        source in 0usize..16,
        target in 0usize..16,
    ) {
        let engine = LayoutEngine::default();
        let out = engine.swap(&snapshot, source, target);
        let before: BTreeSet<_> = snapshot.modules().cloned().collect();
        let after: BTreeSet<_> = out.modules().cloned().collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn toggle_twice_restores_width(snapshot in snapshot_strategy(), index in 0usize..16) {
        let engine = LayoutEngine::default();
        let Some(key) = snapshot.module_at(index).cloned() else {
            return Ok(());
        };
        let once = engine.toggle_expand(&snapshot, index);
        let position = once.position_of(key.as_str()).expect("toggled module stays placed");
        let twice = engine.toggle_expand(&once, position);
        prop_assert_eq!(
            twice.span(&key) == FULL_WIDTH_SPAN,
            snapshot.span(&key) == FULL_WIDTH_SPAN
        );
    }
}
