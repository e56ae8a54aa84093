pub mod delete;
pub mod get;
pub mod list;

use validator::ValidationError;

/// Faculty names are matched exactly, so only an empty or all-whitespace
/// name is rejected.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Faculty name must not be blank".into());
        return Err(err);
    }
    Ok(())
}
