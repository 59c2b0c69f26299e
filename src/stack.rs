//! Stack growth for the recursive parser and evaluator.
//!
//! Deeply nested source (or deeply recursive programs) would otherwise
//! overflow the host thread's stack; `stacker` allocates a new segment
//! when less than the red zone remains.

/// Grow the stack when less than this remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[cfg(test)]
mod tests {
    use super::ensure_sufficient_stack;

    fn depth(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
    }

    #[test]
    fn test_deep_recursion() {
        assert_eq!(depth(100_000), 100_000);
    }
}
