pub mod faculties;
pub mod health;
