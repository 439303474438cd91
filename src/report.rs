use std::{error, fmt};

use crate::{Coloured, TracedError};

/// Substrings marking resolved function names that belong to the runtime or the call machinery
/// rather than to code a reader of a report cares about. This includes the crate's own wrap entry
/// points and capture walk, so any of their frames surviving the fixed skip in
/// [`crate::StackTrace::capture`] still never reach a report and the first rendered frame is the
/// call site that requested the wrap.
const INTERNAL_FRAME_MARKERS: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "backtrace::",
    "traced_error::traced_error::wrap",
    "traced_error::stack_trace::StackTrace::capture",
    "traced_error::result_ext::",
    "__rust",
    "__libc",
    "_start",
];

fn internal_frame(function: &str) -> bool {
    INTERNAL_FRAME_MARKERS
        .iter()
        .any(|marker| function.contains(marker))
}

/// Format any error for display.
///
/// `None` gives an empty string, a [`TracedError`] gives the full rendered report, any other
/// error gives its own text unchanged. This hides from calling code whether enrichment occurred.
pub fn report(err: Option<&(dyn error::Error + 'static)>) -> String {
    let Some(err) = err else {
        return String::new();
    };
    match err.downcast_ref::<TracedError>() {
        Some(traced) => traced.render(),
        None => err.to_string(),
    }
}

impl TracedError {
    /// Display this error nicely: the payload and user message when present, the root cause, and
    /// the captured stack trace resolved to function names and source locations. Honours the
    /// process wide colour flag at the time of the call, the text content is identical either way.
    fn display_report(&self, f: &mut impl fmt::Write) -> fmt::Result {
        if !self.payload().is_empty() {
            writeln!(f, "{}: {}", "Payload".bright_yellow(), self.payload())?;
        }
        writeln!(f, "{}", "Error Details".bright_white())?;
        writeln!(
            f,
            "{}: {}",
            "Error".bright_red(),
            self.original().to_string().red()
        )?;
        if !self.user_message().is_empty() {
            writeln!(
                f,
                "{}: {}",
                "User Message".bright_cyan(),
                self.user_message().cyan()
            )?;
        }
        writeln!(f, "\n{}", "Stack Trace".bright_white())?;
        for frame in self.stack_trace().resolve() {
            if internal_frame(&frame.function) {
                continue;
            }
            writeln!(f, "{}", frame.function.bright_blue())?;
            writeln!(f, "\t{}:{}", frame.file.white(), frame.line)?;
        }
        Ok(())
    }

    /// Render the full report as a string, see [`Self::display_report`].
    pub fn render(&self) -> String {
        let mut string = String::new();
        self.display_report(&mut string)
            .expect("Errored while writing to string");
        string
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{coloured::test_support::colour_lock, set_colour_enabled, wrap};

    #[derive(Debug, thiserror::Error)]
    #[error("base error")]
    struct BaseError;

    #[derive(Debug, thiserror::Error)]
    #[error("simple error")]
    struct SimpleError;

    #[test]
    fn report_nothing() {
        assert_eq!(report(None), "");
    }

    #[test]
    fn report_plain_error() {
        assert_eq!(report(Some(&SimpleError)), "simple error");
    }

    #[test]
    fn report_traced_error() {
        let _guard = colour_lock();
        set_colour_enabled(false);

        let traced = wrap(Some(BaseError), "test payload", "test message").unwrap();
        let rendered = report(Some(&traced));
        assert!(rendered.contains("Payload: test payload"));
        assert!(rendered.contains("Error Details"));
        assert!(rendered.contains("Error: base error"));
        assert!(rendered.contains("User Message: test message"));
        assert!(rendered.contains("Stack Trace"));

        set_colour_enabled(true);
    }

    #[test]
    fn empty_fields_are_left_out() {
        let _guard = colour_lock();
        set_colour_enabled(false);

        let traced = wrap(Some(BaseError), "", "").unwrap();
        let rendered = traced.render();
        assert!(!rendered.contains("Payload:"));
        assert!(!rendered.contains("User Message:"));
        assert!(rendered.starts_with("Error Details\nError: base error\n"));

        set_colour_enabled(true);
    }

    #[test]
    fn colourless_render_has_no_escapes() {
        let _guard = colour_lock();
        set_colour_enabled(false);

        let traced = wrap(Some(BaseError), "p", "m").unwrap();
        assert!(!traced.render().contains('\x1b'));

        set_colour_enabled(true);
    }

    #[test]
    fn coloured_render_marks_the_error_line() {
        let _guard = colour_lock();
        set_colour_enabled(true);

        let traced = wrap(Some(BaseError), "p", "m").unwrap();
        let rendered = traced.render();
        assert!(rendered.contains("\x1b[91mError\x1b[0m: \x1b[31mbase error\x1b[0m"));
        assert!(rendered.contains("\x1b[93mPayload\x1b[0m: p"));
        assert!(rendered.contains("\x1b[96mUser Message\x1b[0m: \x1b[36mm\x1b[0m"));
        assert!(rendered.contains("\x1b[97mError Details\x1b[0m"));
    }

    #[test]
    fn render_is_deterministic() {
        let _guard = colour_lock();
        set_colour_enabled(true);

        let traced = wrap(Some(BaseError), "p", "m").unwrap();
        assert_eq!(traced.render(), traced.render());
    }

    #[test]
    fn internal_frames_are_filtered() {
        let _guard = colour_lock();
        set_colour_enabled(false);

        let traced = wrap(Some(BaseError), "", "").unwrap();
        let rendered = traced.render();
        let (_, stack) = rendered
            .split_once("\nStack Trace\n")
            .expect("Rendered report misses the stack trace section");
        for line in stack.lines().filter(|line| !line.starts_with('\t')) {
            assert!(
                !internal_frame(line),
                "Runtime machinery frame leaked into the report: {line}"
            );
        }

        set_colour_enabled(true);
    }

    #[test]
    fn first_rendered_frame_is_the_wrap_call_site() {
        let _guard = colour_lock();
        set_colour_enabled(false);

        let traced = wrap(Some(BaseError), "", "").unwrap();
        let rendered = traced.render();
        let (_, stack) = rendered
            .split_once("\nStack Trace\n")
            .expect("Rendered report misses the stack trace section");
        let first = stack.lines().next().expect("Rendered stack trace is empty");
        assert!(
            first.contains("first_rendered_frame_is_the_wrap_call_site"),
            "First rendered frame is not the wrap call site: {first}"
        );
        assert!(
            !stack.contains("wrap_traced") && !stack.contains("StackTrace::capture"),
            "Wrap machinery frame leaked into the report:\n{stack}"
        );

        set_colour_enabled(true);
    }
}
