use std::{
    backtrace::{Backtrace, BacktraceStatus},
    sync::Arc,
};

/// Where a launch error was raised.
///
/// Frames are only resolved when `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` enables it, so
/// validation failures stay cheap by default.
#[derive(Clone)]
pub struct BackTrace {
    frames: Arc<Backtrace>,
}

impl BackTrace {
    /// Captures the call stack of the current thread.
    pub fn capture() -> Self {
        Self {
            frames: Arc::new(Backtrace::capture()),
        }
    }

    /// Whether frames were actually recorded.
    pub fn is_captured(&self) -> bool {
        self.frames.status() == BacktraceStatus::Captured
    }
}

impl core::fmt::Display for BackTrace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.frames.status() {
            BacktraceStatus::Captured => write!(f, "{}", self.frames),
            _ => f.write_str("set RUST_BACKTRACE=1 to record where the launch failed"),
        }
    }
}

impl core::fmt::Debug for BackTrace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_never_empty() {
        let backtrace = BackTrace::capture();

        assert!(!backtrace.to_string().is_empty());
        assert_eq!(backtrace.is_captured(), backtrace.clone().is_captured());
    }
}
