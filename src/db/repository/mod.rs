//! Repository layer: collection-scoped store operations.
//!
//! One sub-module per collection; all public functions are re-exported here.

mod doctor;
mod preference;
mod specialty;
mod user;

pub use doctor::*;
pub use preference::*;
pub use specialty::*;
pub use user::*;
