#![no_main]

use dashgrid_layout::{LayoutEngine, decode_snapshot, encode_snapshot};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Split the input into the two persisted values at the first NUL.
    let text = String::from_utf8_lossy(data);
    let (layout, spans) = match text.split_once('\0') {
        Some((layout, spans)) => (Some(layout), Some(spans)),
        None => (Some(text.as_ref()), None),
    };

    let engine = LayoutEngine::default();
    let snapshot = decode_snapshot(layout, spans, &engine);
    assert!(snapshot.is_canonical(), "{:?}", snapshot.invariant_report());

    let persisted = encode_snapshot(&snapshot).expect("snapshot always encodes");
    let again = decode_snapshot(
        Some(&persisted.layout_json),
        Some(&persisted.spans_json),
        &engine,
    );
    assert_eq!(again, snapshot);
});
