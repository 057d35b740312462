//! Frame fallback ordering across readable and unreadable sources.

use std::sync::Arc;

use crashview_core::{ExtractError, SourceExtractor, StackTrace};
use crashview_test_utils::fixtures::{SourceFixture, numbered_source};
use crashview_test_utils::reader::MemoryReader;
use crashview_test_utils::stack::StackBuilder;
use pretty_assertions::assert_eq;

#[test_log::test(tokio::test)]
async fn test_falls_back_to_first_readable_frame() {
    let reader = Arc::new(
        MemoryReader::new()
            .with_file("/app/routes.ts", &numbered_source(40))
            .with_file("/app/main.ts", &numbered_source(40)),
    );
    let stack = StackBuilder::new("TypeError: boom")
        .frame("dep", "https://cdn.example.com/dep.ts", 3, 1)
        .frame("route", "/app/routes.ts", 20, 4)
        .frame("main", "/app/main.ts", 5, 1)
        .build();
    let trace = StackTrace::parse(&stack);

    let extractor = SourceExtractor::new(reader.clone());
    let resolved = extractor.extract_first(&trace).await.unwrap();

    assert_eq!(resolved.frame.file, "/app/routes.ts");
    assert_eq!(resolved.index, 1);
    assert_eq!(resolved.window.highlighted_line(), "line 20");
    // Stops at the first success.
    assert_eq!(
        reader.attempts(),
        vec!["https://cdn.example.com/dep.ts", "/app/routes.ts"]
    );
}

#[tokio::test]
async fn test_out_of_range_line_falls_through() {
    let reader = Arc::new(
        MemoryReader::new()
            .with_file("/a.ts", &numbered_source(3))
            .with_file("/b.ts", &numbered_source(3)),
    );
    let trace = StackTrace::parse(
        &StackBuilder::new("Error")
            .frame("a", "/a.ts", 50, 1)
            .frame("a0", "/a.ts", 0, 1)
            .anonymous("/b.ts", 2, 1)
            .build(),
    );

    let resolved = SourceExtractor::new(reader.clone())
        .extract_first(&trace)
        .await
        .unwrap();
    assert_eq!(resolved.frame.file, "/b.ts");
    assert_eq!(resolved.index, 2);
    assert_eq!(reader.attempts().len(), 3);
}

#[tokio::test]
async fn test_blank_only_window_falls_through() {
    let reader = Arc::new(
        MemoryReader::new()
            .with_file("/blank.ts", "\n")
            .with_file("/good.ts", &numbered_source(3)),
    );
    let trace = StackTrace::parse(
        &StackBuilder::new("Error")
            .anonymous("/blank.ts", 1, 1)
            .anonymous("/good.ts", 2, 1)
            .build(),
    );

    let resolved = SourceExtractor::new(reader.clone())
        .extract_first(&trace)
        .await
        .unwrap();
    assert_eq!(resolved.frame.file, "/good.ts");
    assert_eq!(resolved.index, 1);
    assert_eq!(resolved.window.highlighted_line(), "line 2");
    assert_eq!(reader.attempts(), vec!["/blank.ts", "/good.ts"]);
}

#[tokio::test]
async fn test_all_frames_unreadable_is_not_found() {
    let reader = Arc::new(MemoryReader::new());
    let trace = StackTrace::parse(
        &StackBuilder::new("Error")
            .frame("a", "/a.ts", 1, 1)
            .frame("b", "/b.ts", 1, 1)
            .build(),
    );

    let err = SourceExtractor::new(reader.clone())
        .extract_first(&trace)
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::NotFound { attempted: 2 }));
    assert_eq!(reader.attempts(), vec!["/a.ts", "/b.ts"]);
}

#[tokio::test]
async fn test_frames_without_file_are_skipped() {
    let reader = Arc::new(MemoryReader::new().with_file("/ok.ts", "only line"));
    let trace = StackTrace::from(vec![
        crashview_core::StackFrame {
            method: Some("native".to_string()),
            file: String::new(),
            line: 1,
            column: 1,
        },
        crashview_core::StackFrame {
            method: None,
            file: "/ok.ts".to_string(),
            line: 1,
            column: 1,
        },
    ]);

    let resolved = SourceExtractor::new(reader.clone())
        .extract_first(&trace)
        .await
        .unwrap();
    assert_eq!(resolved.index, 1);
    assert_eq!(resolved.window.lines(), &["only line"]);
    assert_eq!(reader.attempts(), vec!["/ok.ts"]);
}

#[tokio::test]
async fn test_unreadable_local_then_readable_local() {
    let fixture = SourceFixture::new();
    let good = fixture.numbered("src/good.ts", 12).await;
    let bad = fixture.missing("src/bad.ts");

    let trace = StackTrace::parse(
        &StackBuilder::new("Error: x")
            .frame("bad", &format!("file://{bad}"), 4, 2)
            .frame("good", &format!("file://{good}"), 12, 2)
            .build(),
    );

    let extractor =
        SourceExtractor::new(Arc::new(crashview_core::LocalFileReader)).with_radius(2);
    let resolved = extractor.extract_first(&trace).await.unwrap();
    assert_eq!(resolved.frame.file, good);
    assert_eq!(
        resolved.window.lines(),
        &["line 10", "line 11", "line 12"]
    );
    assert_eq!(resolved.window.highlight_offset(), 2);
}
