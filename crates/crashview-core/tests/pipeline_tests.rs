//! End-to-end error handling: raised error in, HTML page out.

use std::sync::Arc;

use crashview_config::Environment;
use crashview_core::handler::HTML_CONTENT_TYPE;
use crashview_core::template::FileTemplate;
use crashview_core::{
    BoxFuture, CodeHighlighter, DecorationRegion, ErrorHandler, HandlerError, HighlightError,
    HtmlHighlighter, RaisedError, RequestInfo, SourceExtractor, SyntaxHighlighter,
};
use crashview_test_utils::config::TestConfigBuilder;
use crashview_test_utils::fixtures::SourceFixture;
use crashview_test_utils::reader::MemoryReader;
use crashview_test_utils::stack::StackBuilder;
use pretty_assertions::assert_eq;

/// Engine that echoes its inputs so tests can see what the decorator sent.
struct EchoEngine;

impl SyntaxHighlighter for EchoEngine {
    fn name(&self) -> &str {
        "echo"
    }

    fn highlight<'a>(
        &'a self,
        source: &'a str,
        language: &'a str,
        regions: &'a [DecorationRegion],
    ) -> BoxFuture<'a, Result<String, HighlightError>> {
        Box::pin(async move {
            let r = &regions[0];
            Ok(format!(
                "lang={language} regions={} line={} cols={}..{} class={} lines={}",
                regions.len(),
                r.line_index,
                r.start_column,
                r.end_column,
                r.class,
                source.lines().count()
            ))
        })
    }
}

fn memory_handler(reader: Arc<MemoryReader>, template: &str) -> ErrorHandler {
    ErrorHandler::new(
        Environment::Development,
        SourceExtractor::new(reader.clone()).with_radius(2),
        CodeHighlighter::new(Arc::new(EchoEngine), "ts"),
        Arc::new(FileTemplate::new(template, reader)),
    )
}

#[test_log::test(tokio::test)]
async fn test_context_payload_reaches_template() {
    let reader = Arc::new(
        MemoryReader::new()
            .with_file("/srv/app.ts", "a\nbb\nccc\ndddd\neeeee\nffffff")
            .with_file(
                "/tpl/dev.html",
                "{{ name }}|{{ message }}|{{ code }}|{{ file }}:{{ line }}|{{ request.method }} {{ request.uri }}|{{ status }}",
            ),
    );
    let stack = StackBuilder::new("RangeError: too far")
        .frame("async step", "/srv/app.ts", 4, 2)
        .build();
    let error = RaisedError::new("RangeError", "too far", stack)
        .with_status(422)
        .with_request(RequestInfo::new("POST", "/orders"));

    let page = memory_handler(reader, "/tpl/dev.html")
        .handle(&error)
        .await
        .unwrap();

    assert_eq!(page.status, 422);
    assert_eq!(page.content_type(), HTML_CONTENT_TYPE);
    assert_eq!(
        page.body,
        "RangeError|too far|lang=ts regions=1 line=2 cols=0..4 class=highlighted-line lines=5|/srv/app.ts:4|POST /orders|422"
    );
}

#[tokio::test]
async fn test_stack_lines_are_exposed_as_json() {
    let reader = Arc::new(
        MemoryReader::new()
            .with_file("/srv/app.ts", "x")
            .with_file("/tpl/dev.html", "{{ stack.lines }}"),
    );
    let stack = StackBuilder::new("Error")
        .frame("f", "/srv/app.ts", 1, 1)
        .build();

    let page = memory_handler(reader, "/tpl/dev.html")
        .handle(&RaisedError::new("Error", "", stack))
        .await
        .unwrap();
    assert_eq!(
        page.body,
        "[{&quot;method&quot;:&quot;f&quot;,&quot;file&quot;:&quot;/srv/app.ts&quot;,&quot;line&quot;:1,&quot;col&quot;:1}]"
    );
}

#[tokio::test]
async fn test_blank_frame_does_not_fail_the_page() {
    let reader = Arc::new(
        MemoryReader::new()
            .with_file("/blank.ts", "\n")
            .with_file("/good.ts", "one\ntwo\nthree")
            .with_file("/tpl.html", "{{ file }}:{{ line }}"),
    );
    let stack = StackBuilder::new("Error")
        .anonymous("/blank.ts", 1, 1)
        .anonymous("/good.ts", 2, 1)
        .build();

    let page = memory_handler(reader, "/tpl.html")
        .handle(&RaisedError::new("Error", "", stack))
        .await
        .unwrap();
    assert_eq!(page.body, "/good.ts:2");
}

#[tokio::test]
async fn test_missing_template_is_render_error() {
    let reader = Arc::new(MemoryReader::new().with_file("/srv/app.ts", "x"));
    let stack = StackBuilder::new("Error")
        .anonymous("/srv/app.ts", 1, 1)
        .build();

    let err = memory_handler(reader, "/tpl/missing.html")
        .handle(&RaisedError::new("Error", "", stack))
        .await
        .unwrap_err();
    assert!(matches!(err, HandlerError::Render(_)));
}

#[tokio::test]
async fn test_from_config_renders_builtin_page() {
    let fixture = SourceFixture::new();
    let file = fixture
        .write(
            "routes/users.ts",
            "export function show(id: string) {\n  const user = db.find(id);\n  return user.name;\n}\n",
        )
        .await;
    let stack = StackBuilder::new("TypeError: Cannot read properties of undefined (reading 'name')")
        .frame("async show", &format!("file://{file}"), 3, 15)
        .anonymous("https://deno.land/x/raptor/kernel.ts", 88, 9)
        .build();

    let config = TestConfigBuilder::new().fetch_enabled(false).radius(1).build();
    let handler = ErrorHandler::from_config(&config).unwrap();
    let page = handler
        .handle(
            &RaisedError::new(
                "TypeError",
                "Cannot read properties of undefined (reading 'name')",
                stack,
            )
            .with_request(RequestInfo::new("GET", "/users/7")),
        )
        .await
        .unwrap();

    assert_eq!(page.status, 500);
    assert!(page.body.contains("<!DOCTYPE html>"));
    assert!(page.body.contains("GET /users/7"));
    assert!(page.body.contains(">return</span> "));
    assert!(page.body.contains(">user</span>.name;"));
    assert!(page.body.contains("class=\"highlighted-line\""));
    // radius 1 around line 3 of 4
    assert_eq!(page.body.matches("<span class=\"line\">").count(), 3);
    assert!(page.body.contains("https://deno.land/x/raptor/kernel.ts:88:9"));
}

#[tokio::test]
async fn test_from_config_with_file_template() {
    let fixture = SourceFixture::new();
    let source = fixture.numbered("app.ts", 3).await;
    let template = fixture.write("dev.html", "<main>{{ code }}</main>").await;

    let config = TestConfigBuilder::new()
        .fetch_enabled(false)
        .theme("plain")
        .template_path(&template)
        .build();
    let page = ErrorHandler::from_config(&config)
        .unwrap()
        .handle(&RaisedError::new(
            "Error",
            "x",
            StackBuilder::new("Error: x").anonymous(&source, 2, 1).build(),
        ))
        .await
        .unwrap();

    assert!(page.body.starts_with("<main><pre class=\"crashview-code theme-plain\""));
    assert!(page.body.ends_with("</code></pre></main>"));
}

#[tokio::test]
async fn test_production_config_hides_everything() {
    let config = TestConfigBuilder::new().production().build();
    let page = ErrorHandler::from_config(&config)
        .unwrap()
        .handle(&RaisedError::new(
            "TypeError",
            "db password is hunter2",
            "TypeError: db password is hunter2\n    at /srv/secret.ts:1:1",
        ))
        .await
        .unwrap();
    assert!(!page.body.contains("hunter2"));
    assert!(!page.body.contains("/srv/secret.ts"));
}

#[tokio::test]
async fn test_custom_production_template_sees_no_details() {
    let reader = Arc::new(MemoryReader::new().with_file(
        "/tpl/prod.html",
        "{{ name }}|{{ message }}|{{ stack.raw }}|{{ file }}|{{ request.uri }}|{{ status }}",
    ));
    let handler = ErrorHandler::new(
        Environment::Production,
        SourceExtractor::new(reader.clone()),
        CodeHighlighter::new(Arc::new(EchoEngine), "ts"),
        Arc::new(FileTemplate::new("/tpl/dev.html", reader.clone())),
    )
    .with_production_template(Arc::new(FileTemplate::new("/tpl/prod.html", reader.clone())));

    let error = RaisedError::new(
        "TypeError",
        "db password is hunter2",
        "TypeError: db password is hunter2\n    at /srv/secret.ts:1:1",
    )
    .with_status(503)
    .with_request(RequestInfo::new("GET", "/admin"));
    let page = handler.handle(&error).await.unwrap();

    assert_eq!(page.status, 503);
    assert_eq!(page.body, "TypeError|||||503");
    // No source was read and the development template was never loaded.
    assert_eq!(reader.attempts(), vec!["/tpl/prod.html"]);
}

#[test]
fn test_from_config_rejects_invalid_config() {
    let config = TestConfigBuilder::new().fetch_timeout_secs(0).build();
    assert!(matches!(
        ErrorHandler::from_config(&config),
        Err(HandlerError::Config(_))
    ));
}

#[tokio::test]
async fn test_handler_is_shareable_across_tasks() {
    let reader = Arc::new(
        MemoryReader::new()
            .with_file("/a.ts", "alpha")
            .with_file("/b.ts", "beta")
            .with_file("/tpl.html", "{{ file }}"),
    );
    let handler = Arc::new(memory_handler(reader, "/tpl.html"));

    let mut tasks = Vec::new();
    for file in ["/a.ts", "/b.ts", "/a.ts", "/b.ts"] {
        let handler = handler.clone();
        tasks.push(tokio::spawn(async move {
            let stack = StackBuilder::new("Error").anonymous(file, 1, 1).build();
            let page = handler
                .handle(&RaisedError::new("Error", "", stack))
                .await
                .unwrap();
            (file, page.body)
        }));
    }
    for task in tasks {
        let (file, body) = task.await.unwrap();
        assert_eq!(body, file);
    }
}

#[tokio::test]
async fn test_builtin_html_engine_through_handler() {
    let reader = Arc::new(MemoryReader::new().with_file("/x.ts", "let a = 1;\nlet b = a.c.d;"));
    let handler = ErrorHandler::new(
        Environment::Development,
        SourceExtractor::new(reader.clone()),
        CodeHighlighter::new(Arc::new(HtmlHighlighter::default()), "ts"),
        Arc::new(crashview_core::template::BuiltinTemplate),
    );
    let page = handler
        .handle(&RaisedError::new(
            "TypeError",
            "a.c is undefined",
            "TypeError\n    at /x.ts:2:9",
        ))
        .await
        .unwrap();
    assert!(page.body.contains(">let</span> "));
    assert!(page.body.contains(">a</span>.c.d;</span>"));
}
