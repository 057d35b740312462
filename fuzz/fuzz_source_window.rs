//! Fuzz target for source window arithmetic.
//!
//! Run with: cargo +nightly fuzz run fuzz_source_window
//!
//! Builds windows from arbitrary line counts, targets and radii and checks
//! the window bounds and highlight offset against a direct computation.

#![no_main]

use crashview_core::SourceWindow;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let total = usize::from(data[0]);
    let line = u32::from(data[1]) | (u32::from(data[2]) << 8);
    let radius = usize::from(data[3]);
    let lines: Vec<String> = (1..=total).map(|i| format!("line {i}")).collect();

    match SourceWindow::from_lines(&lines, line, radius) {
        Ok(window) => {
            let t = line as usize;
            assert!(t >= 1 && t <= total);
            let start = t.saturating_sub(radius).max(1);
            let end = (t + radius).min(total);
            assert_eq!(window.start_line(), start);
            assert_eq!(window.lines().len(), end - start + 1);
            assert_eq!(window.highlight_offset(), t - start);
            assert_eq!(window.highlighted_line(), format!("line {t}"));
        }
        Err(_) => assert!(line == 0 || line as usize > total),
    }
});
