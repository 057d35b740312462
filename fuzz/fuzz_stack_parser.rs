//! Fuzz target for the stack trace parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_stack_parser
//!
//! Feeds arbitrary text to `StackTrace::parse()` and checks that it never
//! yields more frames than lines and that every frame renders back to a line
//! the parser accepts.

#![no_main]

use crashview_core::StackTrace;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let trace = StackTrace::parse(text);
    assert!(trace.len() <= text.lines().count());

    for frame in &trace {
        if let Some(method) = &frame.method {
            assert!(!method.is_empty());
            assert!(crashview_core::StackFrame::parse_line(&frame.to_string()).is_some());
        }
    }
});
