//! Path validation shared by every file input.

use std::path::Path;

use crate::error::CardError;

/// Fail with [`CardError::NotFound`] unless `path` exists.
///
/// # Errors
///
/// Returns an error if nothing exists at `path`.
pub fn check_path(path: &Path) -> Result<(), CardError> {
    if path.exists() {
        Ok(())
    } else {
        Err(CardError::NotFound { path: path.to_path_buf() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_path_passes() {
        assert!(check_path(&std::env::temp_dir()).is_ok());
    }

    #[test]
    fn missing_path_is_not_found() {
        let err = check_path(Path::new("/nonexistent/socialcard/art.png")).unwrap_err();
        assert!(matches!(err, CardError::NotFound { .. }));
        assert_eq!(err.to_string(), "/nonexistent/socialcard/art.png not found");
    }
}
