pub mod faculties;
