//! Value objects - Immutable objects defined by their attributes

mod flags;
mod names;
mod resources;

pub use flags::{flag_keys, FlagSet};
pub use names::PlayerName;
pub use resources::{Percentage, ResourceDelta, Resources};
