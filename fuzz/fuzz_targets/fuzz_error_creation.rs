#![no_main]

use classified_errors::{ClassifiedError, ErrorCode, code_of, is_classified_as};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data).into_owned();
    let mid = text
        .char_indices()
        .nth(text.chars().count() / 2)
        .map_or(text.len(), |(i, _)| i);
    let (id, message) = text.split_at(mid);
    let code = ErrorCode::new(id.to_owned());

    let err = ClassifiedError::new(code.clone(), Some(message.into()), message.to_owned());
    assert!(is_classified_as(&err, &code));

    let wrapped = ClassifiedError::wrap(err, text.clone());
    assert_eq!(code_of(&wrapped), code);
});
