#![no_main]

use libfuzzer_sys::fuzz_target;
use yaml_edit::Span;
use yaml_edit::splice::splice;

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    let rune_len = source.chars().count();
    if rune_len < 2 {
        return;
    }

    // Carve a couple of non-overlapping spans out of the source's rune range; any panic here,
    // or output that drops/duplicates untouched runes, is a bug.
    let mid = (rune_len / 2).max(1);
    let ops = vec![
        Span::new(0, 1).unwrap().with("X"),
        Span::new(mid, rune_len).unwrap().with("Y"),
    ];

    let _ = splice(ops, source);
});
