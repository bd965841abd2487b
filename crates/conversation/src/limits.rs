/// Retention caps for the persisted lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    /// Conversations kept; the least recently active are evicted
    pub max_conversations: usize,
    /// Feedback records kept; the oldest are evicted
    pub max_feedback: usize,
    /// Learning patterns kept; the least frequent are evicted
    pub max_patterns: usize,
}

pub const DEFAULT_MAX_CONVERSATIONS: usize = 50;
pub const DEFAULT_MAX_FEEDBACK: usize = 500;
pub const DEFAULT_MAX_PATTERNS: usize = 200;

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            max_conversations: DEFAULT_MAX_CONVERSATIONS,
            max_feedback: DEFAULT_MAX_FEEDBACK,
            max_patterns: DEFAULT_MAX_PATTERNS,
        }
    }
}
