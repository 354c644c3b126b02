//! Per-invocation context handed to every operation
//!
//! Carries the platform collaborators and the caller's logging span. Each
//! operation narrows the span with [`Context::child`] instead of reaching for
//! process-wide logging state.

use tracing::Span;

use crate::platform::{Clock, HttpClient};

#[derive(Clone)]
pub struct Context<'a> {
    pub http: &'a dyn HttpClient,
    pub clock: &'a dyn Clock,
    pub span: Span,
}

impl<'a> Context<'a> {
    pub fn new(http: &'a dyn HttpClient, clock: &'a dyn Clock, span: Span) -> Self {
        Self { http, clock, span }
    }

    /// Same collaborators, logging scoped to the named operation
    pub fn child(&self, operation: &'static str) -> Self {
        Self {
            http: self.http,
            clock: self.clock,
            span: tracing::debug_span!(parent: &self.span, "ghauth", op = operation),
        }
    }
}
