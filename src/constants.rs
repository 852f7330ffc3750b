//! Configuration constants for the quiz room system
//!
//! This module contains the limits and timing parameters used throughout
//! the room lifecycle, kept in one place so the boundaries of the system
//! are easy to audit.

/// Room-level configuration constants
pub mod room {
    /// Number of base-36 characters in a room code
    pub const CODE_LENGTH: usize = 6;
    /// Maximum number of players allowed in a single room
    pub const MAX_PLAYER_COUNT: usize = 1000;
    /// Difficulty level used when the host does not specify one
    pub const DEFAULT_LEVEL: u8 = 1;
}

/// Question presentation and scoring constants
pub mod question {
    /// Time in seconds players have to answer a question
    pub const TIME_LIMIT_SECONDS: u64 = 25;
    /// Delay in milliseconds after the time limit before the answer is revealed
    pub const REVEAL_GRACE_MILLIS: u64 = 200;
    /// Points awarded for a correct answer
    pub const POINTS_PER_CORRECT: u64 = 100;
}

/// Display name configuration constants
pub mod name {
    /// Maximum length of a display name in bytes
    pub const MAX_LENGTH: usize = 30;
}
