use std::{borrow::Cow, error, fmt};

use crate::StackTrace;

/// The boxed form any wrapped error is stored as.
pub type DynError = Box<dyn error::Error + Send + Sync + 'static>;

/// An error enriched with a user facing message, an opaque payload, and the call stack at the
/// moment of the most recent wrap.
///
/// There is never more than one level of nesting: wrapping a `TracedError` merges the context
/// into a single new entity instead of stacking entities, see [`wrap`].
pub struct TracedError {
    /// The root cause being wrapped, never itself unwrapped further
    original: DynError,
    /// Human facing explanation, accumulates across merges
    user_message: Cow<'static, str>,
    /// Opaque caller supplied context, for example an identifier
    payload: Cow<'static, str>,
    /// The call chain at the moment of the most recent wrap
    stack_trace: StackTrace,
}

/// Wrap an error with an opaque payload and a user facing message, capturing the call stack at
/// this call site.
///
/// * `None` stays `None`, success is never wrapped.
/// * A plain error becomes a new [`TracedError`] carrying the given context.
/// * An error that already is a [`TracedError`] is merged, not nested: the root cause is carried
///   over unchanged, a non empty `payload` replaces the existing one while an empty `payload`
///   preserves it, non empty messages accumulate (existing first, newline separated), and the
///   stack trace is refreshed to this call site.
///
/// This operation cannot fail.
// Never inlined so the capture below always finds this frame and cannot skip past the caller
#[inline(never)]
pub fn wrap<E>(
    err: Option<E>,
    payload: impl Into<Cow<'static, str>>,
    message: impl Into<Cow<'static, str>>,
) -> Option<TracedError>
where
    E: Into<DynError>,
{
    Some(wrap_traced(err?.into(), payload.into(), message.into()))
}

/// The shared wrap path. Forced inline so the stack capture below sits at a fixed depth from the
/// public entry points.
#[inline(always)]
pub(crate) fn wrap_traced(
    err: DynError,
    payload: Cow<'static, str>,
    message: Cow<'static, str>,
) -> TracedError {
    let stack_trace = StackTrace::capture();
    match TracedError::from_dyn(err) {
        Ok(existing) => existing.merge(payload, message, stack_trace),
        Err(original) => TracedError {
            original,
            user_message: message,
            payload,
            stack_trace,
        },
    }
}

impl TracedError {
    /// Recover a `TracedError` travelling as a boxed error, or give the box back unchanged.
    pub fn from_dyn(err: DynError) -> Result<Self, DynError> {
        err.downcast::<Self>().map(|boxed| *boxed)
    }

    /// Combine the existing context with newly given context into a single flat entity.
    fn merge(
        self,
        payload: Cow<'static, str>,
        message: Cow<'static, str>,
        stack_trace: StackTrace,
    ) -> Self {
        let payload = if payload.is_empty() {
            self.payload
        } else {
            payload
        };
        let user_message = match (self.user_message.is_empty(), message.is_empty()) {
            (false, false) => Cow::Owned(format!("{}\n{}", self.user_message, message)),
            (true, false) => message,
            (_, true) => self.user_message,
        };
        Self {
            original: self.original,
            user_message,
            payload,
            stack_trace,
        }
    }

    /// The root cause beneath the enrichment, retrievable verbatim.
    pub fn original(&self) -> &(dyn error::Error + Send + Sync + 'static) {
        self.original.as_ref()
    }

    /// The accumulated user facing message, possibly empty.
    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    /// The opaque caller supplied payload, possibly empty.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// The call chain captured at the most recent wrap.
    pub fn stack_trace(&self) -> &StackTrace {
        &self.stack_trace
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\nUser Message: {}", self.original, self.user_message)
    }
}

impl fmt::Debug for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl error::Error for TracedError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        let original: &(dyn error::Error + 'static) = self.original.as_ref();
        Some(original)
    }
}
