use std::fmt;

/// Identifier of a stored annotation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureId(u64);

impl FeatureId {
    pub fn new(n: u64) -> Self {
        FeatureId(n)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feature-{}", self.0)
    }
}

/// Identifier of a shape that is still waiting for its metadata.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DraftId(u64);

impl DraftId {
    pub fn new(n: u64) -> Self {
        DraftId(n)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Generation token tagging one overlay request.
///
/// Tokens are handed out in increasing order, so a signal carrying an older
/// token always belongs to an overlay that has already been torn down.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayToken(u32);

impl OverlayToken {
    pub fn new(n: u32) -> Self {
        OverlayToken(n)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Monotonic counter; values are never reused for the lifetime of the allocator.
///
/// Overlay tokens have their own 32-bit counter. It wraps after `u32::MAX`
/// and skips 0, which is well past any number of date selections in a session.
#[derive(Debug, Default, Clone)]
pub struct Sequence {
    next: u64,
    next_token: u32,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_u64(&mut self) -> u64 {
        self.next = self.next.wrapping_add(1);
        self.next
    }

    pub fn next_feature(&mut self) -> FeatureId {
        FeatureId(self.next_u64())
    }

    pub fn next_draft(&mut self) -> DraftId {
        DraftId(self.next_u64())
    }

    pub fn next_token(&mut self) -> OverlayToken {
        self.next_token = self.next_token.checked_add(1).unwrap_or(1);
        OverlayToken(self.next_token)
    }
}

#[cfg(test)]
mod tests {
    use super::Sequence;

    #[test]
    fn sequence_never_repeats() {
        let mut seq = Sequence::new();
        let a = seq.next_feature();
        let b = seq.next_feature();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn tokens_start_after_zero() {
        let mut seq = Sequence::new();
        assert_eq!(seq.next_token().get(), 1);
        assert_eq!(seq.next_token().get(), 2);
    }

    #[test]
    fn tokens_count_separately_and_skip_zero_on_wrap() {
        let mut seq = Sequence::new();
        seq.next_feature();
        seq.next_feature();
        assert_eq!(seq.next_token().get(), 1);
        assert_eq!(seq.next_feature().get(), 3);

        let mut seq = Sequence {
            next: 0,
            next_token: u32::MAX - 1,
        };
        assert_eq!(seq.next_token().get(), u32::MAX);
        assert_eq!(seq.next_token().get(), 1);
    }
}
