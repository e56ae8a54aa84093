pub mod accounts;
pub mod faculty_records;
pub mod mock;
