//! LastPlanner Shared - wire contract between the engine and the player
//!
//! Request bodies, response bodies and route paths used by both sides of the
//! REST interface. Game state itself travels in the domain's own serde shape
//! (`GameState`, `GameStatePatch`), so this crate only adds what the domain
//! has no reason to know about.

pub mod requests;
pub mod responses;
pub mod routes;

pub use requests::{LeaderboardSubmission, RequestError, SaveGameRequest, MAX_SCORE};
pub use responses::{ErrorResponse, UserProfile};
pub use routes::USER_ID_HEADER;
