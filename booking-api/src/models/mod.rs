pub mod appointment;
pub mod availability;
pub mod doctor;
pub mod user;

pub use appointment::*;
pub use availability::*;
pub use doctor::*;
pub use user::*;
