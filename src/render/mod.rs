//! Render-pipeline integration.
//!
//! The external EPUB renderer produces one content fragment per
//! chapter/section boundary and hands it to a [`ContentHook`] immediately
//! before attaching it to the display surface. [`RenderBridge`] is the
//! hook implementation that substitutes redacted markup, so the caller
//! only ever paints filtered content - redaction is a rewrite, not an
//! overlay, and the delivered markup never contains the original flagged
//! text.

use crate::services::ReadingSession;
use std::sync::Arc;

/// One renderable unit of book content.
///
/// Owned transiently by the render pipeline; it has no identity beyond
/// its lifetime in a single render call, and nothing is cached across
/// fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFragment {
    /// The fragment's HTML body.
    pub body: String,
}

impl ContentFragment {
    /// Creates a fragment from an HTML body.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Consumes the fragment, returning its body.
    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }
}

/// Callback seam invoked by the renderer for every fragment, before any
/// user-visible paint.
pub trait ContentHook: Send + Sync {
    /// Rewrites one fragment body, returning the markup to display.
    fn on_content(&self, body: &str) -> String;
}

/// Substitutes redacted markup into the render pipeline.
///
/// Invocation is per fragment, not per book: the session's specification
/// was fetched once before the first fragment, and each call here is a
/// synchronous rewrite on the renderer's own task. The bridge holds no
/// fragment state and never mutates the specification.
pub struct RenderBridge {
    session: Arc<ReadingSession>,
}

impl RenderBridge {
    /// Creates a bridge over an open reading session.
    #[must_use]
    pub fn new(session: Arc<ReadingSession>) -> Self {
        Self { session }
    }

    /// Rewrites a fragment in place.
    pub fn rewrite(&self, fragment: &mut ContentFragment) {
        fragment.body = self.session.redact(&fragment.body);
    }
}

impl ContentHook for RenderBridge {
    fn on_content(&self, body: &str) -> String {
        self.session.redact(body)
    }
}
