#![deny(unsafe_code)]

//! crashview core: developer error pages from raw stack traces.
//!
//! Turns a raised error into a diagnostic page in three stages:
//!
//! 1. [`stack`] parses the raw stack text into ordered [`StackFrame`]s.
//! 2. [`extract`] reads the source behind each frame (through an injected
//!    [`SourceReader`]) and carves a context window around the failing line,
//!    falling back frame by frame until one resolves.
//! 3. [`highlight`] validates the window and hands it, with a single
//!    full-line decoration, to a [`SyntaxHighlighter`].
//!
//! The [`handler`] module composes the stages and feeds the result to a
//! [`TemplateRenderer`].

use std::future::Future;
use std::pin::Pin;

/// A type-erased, `Send`-safe, boxed future: the return type for async
/// trait methods that require dynamic dispatch (`dyn Trait`).
///
/// Native `async fn` in traits produces opaque return types that are **not**
/// object-safe. Traits consumed via `Arc<dyn Trait>` must return a concrete
/// `Pin<Box<dyn Future>>` instead.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// HTML escaping shared by the highlighter and templates.
pub mod escape;
/// Source window extraction and the multi-frame fallback policy.
pub mod extract;
/// Error handler composing parse, extract, highlight, and render.
pub mod handler;
/// Decoration validation and syntax highlighting.
pub mod highlight;
/// Read capability: local files and remote fetches.
pub mod source;
/// Stack trace parsing.
pub mod stack;
/// Page templates and the template context payload.
pub mod template;

pub use extract::{ExtractError, FrameError, ResolvedFrame, SourceExtractor, SourceWindow};
pub use handler::{ErrorHandler, ErrorPage, HandlerError, RaisedError, RequestInfo};
pub use highlight::{
    CodeHighlighter, DecorationRegion, HighlightError, HtmlHighlighter, SyntaxHighlighter, Theme,
};
pub use source::{HttpFetcher, LocalFileReader, ReadError, SourceReader, SourceResolver};
pub use stack::{StackFrame, StackTrace};
pub use template::{RenderError, TemplateContext, TemplateRenderer};
