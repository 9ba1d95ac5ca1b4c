#![no_main]

use classified_errors::{ClassifiedError, MAX_FIELD_OUTPUT_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data).into_owned();
    let err = ClassifiedError::wrap(std::io::Error::other(text.clone()), text);

    let mut line = String::new();
    err.record().write_to(&mut line).unwrap();
    assert!(line.len() <= 4 * MAX_FIELD_OUTPUT_LEN);
});
