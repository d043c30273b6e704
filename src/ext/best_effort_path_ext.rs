use std::path::{Path, PathBuf};

/// Absolute-looking rendering of a path for logs and error messages,
/// regardless of whether the path exists.
pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        match self.canonicalize() {
            Ok(canonical) => canonical.display().to_string(),
            Err(_) => match std::env::current_dir() {
                Ok(current_dir) if self.is_relative() => {
                    current_dir.join(self).display().to_string()
                }
                _ => self.display().to_string(),
            },
        }
    }
}

impl BestEffortPathExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        self.as_path().best_effort_path_display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_path_canonicalizes() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let display = temp_dir.path().best_effort_path_display();
        assert!(Path::new(&display).is_absolute());
    }

    #[test]
    fn missing_relative_path_becomes_absolute() {
        let display = Path::new("does/not/exist.txt").best_effort_path_display();
        assert!(Path::new(&display).is_absolute());
        assert!(display.ends_with("exist.txt"));
    }
}
