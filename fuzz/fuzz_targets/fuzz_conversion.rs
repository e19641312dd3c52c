#![no_main]

use libfuzzer_sys::fuzz_target;
use es5core::conversion::{number_to_int32, number_to_string, number_to_uint32, string_to_number};

fuzz_target!(|data: &[u8]| {
    // Only process valid UTF-8
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    if source.len() > 1_000 {
        return;
    }

    let n = string_to_number(source);
    let printed = number_to_string(n);

    // Number -> String -> Number is exact for every value except NaN
    let reparsed = string_to_number(&printed);
    if n.is_nan() {
        assert!(reparsed.is_nan());
    } else {
        assert_eq!(reparsed, n, "{:?} printed as {}", source, printed);
    }

    assert_eq!(number_to_uint32(n) as i32, number_to_int32(n));
});
