//! Stack growth for deeply recursive evaluation.
//!
//! Nested expressions and non-tail recursion in alang programs map directly
//! onto Rust recursion, so evaluation entry points grow the native stack on
//! demand instead of overflowing.

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (100KB red zone).
    const RED_ZONE: usize = 100 * 1024;

    /// Stack space to allocate when growing (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
