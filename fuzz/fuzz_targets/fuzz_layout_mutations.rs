#![no_main]

use arbitrary::Arbitrary;
use dashgrid_layout::{
    FULL_WIDTH_SPAN, LayoutEngine, LayoutOperation, LayoutSnapshot, ModuleKey, SpanMap,
    is_covered,
};
use libfuzzer_sys::fuzz_target;

const KEYS: [&str; 8] = [
    "nutrition",
    "productivity",
    "fitness",
    "pomodoro",
    "sleep",
    "notes",
    "water",
    "mood",
];

#[derive(Debug, Arbitrary)]
enum FuzzOp {
    Toggle(u8),
    Add(u8, u8),
    Append(u8),
    Remove(u8),
    Swap(u8, u8),
    Compact,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    slots: Vec<Option<u8>>,
    spans: Vec<(u8, u8)>,
    ops: Vec<FuzzOp>,
}

fn key(byte: u8) -> ModuleKey {
    ModuleKey::new(KEYS[usize::from(byte) % KEYS.len()])
}

fn to_operation(op: &FuzzOp) -> LayoutOperation {
    match *op {
        FuzzOp::Toggle(index) => LayoutOperation::ToggleExpand {
            index: usize::from(index),
        },
        FuzzOp::Add(index, module) => LayoutOperation::Add {
            index: usize::from(index),
            module: key(module),
        },
        FuzzOp::Append(module) => LayoutOperation::Append { module: key(module) },
        FuzzOp::Remove(index) => LayoutOperation::Remove {
            index: usize::from(index),
        },
        FuzzOp::Swap(source, target) => LayoutOperation::Swap {
            source: usize::from(source),
            target: usize::from(target),
        },
        FuzzOp::Compact => LayoutOperation::Compact,
    }
}

fn assert_canonical(snapshot: &LayoutSnapshot) {
    let len = snapshot.layout.len();
    assert!(len >= 4 && len % 2 == 0, "bad shape: {snapshot:?}");
    for index in 0..len {
        if is_covered(&snapshot.layout, &snapshot.spans, index) {
            assert!(snapshot.layout[index].is_none(), "covered {index} occupied");
        }
    }
    for (key, span) in &snapshot.spans {
        assert_eq!(*span, FULL_WIDTH_SPAN);
        assert!(snapshot.position_of(key.as_str()).is_some(), "stale span {key}");
    }
    assert!(snapshot.is_canonical(), "{:?}", snapshot.invariant_report());
}

fuzz_target!(|input: FuzzInput| {
    if input.slots.len() > 64 || input.ops.len() > 128 {
        return;
    }
    let engine = LayoutEngine::default();
    let slots: Vec<_> = input.slots.iter().map(|slot| slot.map(key)).collect();
    let spans: SpanMap = input
        .spans
        .iter()
        .map(|&(module, span)| (key(module), span))
        .collect();

    let mut snapshot = engine.compact(&slots, &spans);
    assert_canonical(&snapshot);

    for op in &input.ops {
        let before = snapshot.module_count();
        let outcome = engine.apply(&snapshot, to_operation(op));
        assert_canonical(&outcome.snapshot);
        if !outcome.changed {
            assert_eq!(outcome.snapshot, snapshot);
        }
        if matches!(op, FuzzOp::Toggle(_) | FuzzOp::Swap(..) | FuzzOp::Compact) {
            assert_eq!(outcome.snapshot.module_count(), before);
        }
        snapshot = outcome.snapshot;
    }
});
