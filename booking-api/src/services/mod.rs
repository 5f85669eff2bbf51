mod appointment_service;
mod auth_service;
mod doctor_service;

pub use appointment_service::*;
pub use auth_service::*;
pub use doctor_service::*;
