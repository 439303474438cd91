use std::ffi::c_void;

/// Maximal number of frames recorded for a single capture.
const MAX_FRAMES: usize = 64;
/// Leading frames belonging to the capture machinery itself: the walk of the `backtrace` crate,
/// [`StackTrace::capture`], and the wrap entry point that invoked it. These are skipped so the
/// first recorded frame is the call site that requested the wrap.
const SKIPPED_FRAMES: usize = 3;

/// The program counters of the call chain at the moment of the latest wrap.
///
/// Index 0 is the immediate caller of the wrap operation, later entries walk towards the start of
/// the program. Capturing is cheap, symbol resolution is deferred until the trace is rendered.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct StackTrace {
    frames: Vec<usize>,
}

impl StackTrace {
    /// Walk the current call chain and record up to [`MAX_FRAMES`] program counters.
    #[inline(never)]
    pub(crate) fn capture() -> Self {
        let mut frames = Vec::with_capacity(MAX_FRAMES);
        let mut skipped = 0;
        backtrace::trace(|frame| {
            if skipped < SKIPPED_FRAMES {
                skipped += 1;
                return true;
            }
            frames.push(frame.ip() as usize);
            frames.len() < MAX_FRAMES
        });
        Self { frames }
    }

    /// The raw program counters, most recent call first.
    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    /// The number of captured frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if nothing was captured, which only happens when the call chain was shallower than
    /// the capture machinery itself.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Resolve every captured program counter to symbol information, in capture order. Frames the
    /// symboliser cannot name are dropped, for the rest its best effort output is used as is.
    pub fn resolve(&self) -> Vec<ResolvedFrame> {
        let mut resolved = Vec::with_capacity(self.frames.len());
        for &ip in &self.frames {
            backtrace::resolve(ip as *mut c_void, |symbol| {
                let Some(name) = symbol.name() else { return };
                resolved.push(ResolvedFrame {
                    function: format!("{name:#}"),
                    file: symbol
                        .filename()
                        .map(|path| path.display().to_string())
                        .unwrap_or_default(),
                    line: symbol.lineno().unwrap_or_default(),
                });
            });
        }
        resolved
    }
}

/// A single frame resolved to human readable symbol information.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ResolvedFrame {
    /// The demangled name of the function the frame belongs to
    pub function: String,
    /// The source file, empty when the symboliser could not determine it
    pub file: String,
    /// The line within the source file, 0 when unknown
    pub line: u32,
}
