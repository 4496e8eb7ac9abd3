pub mod dashboard;
pub mod doctors;
pub mod health;
pub mod layout;
pub mod reports;
pub mod specialties;
pub mod theme;
pub mod users;
