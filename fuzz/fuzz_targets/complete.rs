#![no_main]

use libfuzzer_sys::fuzz_target;
use sqlcomplete_core::{Completer, CompleterSettings, CompletionRequest};

fuzz_target!(|data: &[u8]| {
    if let Ok(sql) = std::str::from_utf8(data) {
        let completer = Completer::new(&CompleterSettings::default());

        // Every character boundary is a cursor position worth probing.
        for (offset, _) in sql.char_indices().chain(std::iter::once((sql.len(), ' '))) {
            let request = CompletionRequest::new(sql, offset);
            let _ = completer.complete_request(&request);
        }
    }
});
