use std::path::Path;

use crate::error::AppError;

/// Plain-text rendering is a byte-exact passthrough of the generated content:
/// identical input renders to identical bytes.
pub fn render(raw: &str, path: &Path) -> Result<(), AppError> {
    std::fs::write(path, raw.as_bytes())
        .map_err(|e| AppError::Render(format!("failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let raw = "1. Scope\nEverything.\n\n2. Risks\nNone.\n";

        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        render(raw, &first).unwrap();
        render(raw, &second).unwrap();

        assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
        assert_eq!(std::fs::read_to_string(&first).unwrap(), raw);
    }

    #[test]
    fn unwritable_path_is_a_render_error() {
        let err = render("content", Path::new("/nonexistent/dir/out.txt")).unwrap_err();
        assert!(matches!(err, AppError::Render(_)));
    }
}
