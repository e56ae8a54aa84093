pub mod accounts;
pub mod auth;
pub mod deletion;
pub mod faculties;
