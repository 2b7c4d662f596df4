//! REST route paths (axum 0.8 `{param}` syntax)

/// Header carrying the authenticated account id, set by the session service
/// in front of the engine. Absent for anonymous callers.
pub const USER_ID_HEADER: &str = "x-user-id";

pub const HEALTH: &str = "/api/health";
pub const USER: &str = "/api/user";

pub const GAME: &str = "/api/game";
pub const GAME_BY_SESSION: &str = "/api/game/{session_id}";

pub const LEADERBOARD: &str = "/api/leaderboard";
pub const LEADERBOARD_BY_CHAPTER: &str = "/api/leaderboard/{chapter}";
