pub mod doctor;
pub mod enums;
pub mod specialty;
pub mod user;

pub use doctor::*;
pub use enums::*;
pub use specialty::*;
pub use user::*;
