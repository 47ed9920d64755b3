#![no_main]

use libfuzzer_sys::fuzz_target;
use yaml_edit::requote::requote;

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 64 * 1024 {
        &data[..64 * 1024]
    } else {
        data
    };

    // Split the fuzz input into an "original scalar text" half and a "new value" half; any
    // panic while classifying or re-quoting either half is a bug.
    let mid = data.len() / 2;
    let (a, b) = data.split_at(mid);

    let (Ok(original), Ok(new_value)) = (std::str::from_utf8(a), std::str::from_utf8(b)) else {
        return;
    };

    for indent in [0usize, 2, 4, 8] {
        let _ = requote(new_value, original, indent);
    }
});
