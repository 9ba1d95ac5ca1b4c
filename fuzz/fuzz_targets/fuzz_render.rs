#![no_main]

use classified_errors::{ClassifiedError, ErrorCode, render_error};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&layers, rest)) = data.split_first() else {
        return;
    };
    let text = String::from_utf8_lossy(rest).into_owned();

    let mut err = ClassifiedError::new_with_data(ErrorCode::define("fuzz"), None, text.clone(), rest.len());
    for _ in 0..layers % 32 {
        err = ClassifiedError::wrap(err, text.clone());
    }

    let out = render_error(&err);
    assert!(out.matches("[code: fuzz]").count() > usize::from(layers % 32));
    assert_eq!(format!("{err:#}"), out);
});
