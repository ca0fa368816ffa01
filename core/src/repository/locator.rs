use std::path::PathBuf;

use tracing::debug;

use crate::error::{MapError, Result};
use crate::identity::UserId;

/// Finds a user's spending file by checking `<dir>/<user_id>.json` in each
/// search directory, in order.
#[derive(Clone, Debug)]
pub struct SpendingFileLocator {
    search_dirs: Vec<PathBuf>,
}

impl SpendingFileLocator {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    pub fn locate(&self, user: &UserId) -> Result<PathBuf> {
        let file_name = format!("{}.json", user.as_str());
        let mut searched = Vec::with_capacity(self.search_dirs.len());
        for dir in &self.search_dirs {
            let candidate = dir.join(&file_name);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "found spending file");
                return Ok(candidate);
            }
            searched.push(candidate);
        }

        Err(MapError::SpendingFileNotFound {
            user: user.as_str().to_string(),
            searched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_first_match_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("bob.json"), "[]").unwrap();
        let locator =
            SpendingFileLocator::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);

        let user = UserId::new("bob").unwrap();
        assert_eq!(locator.locate(&user).unwrap(), second.path().join("bob.json"));

        fs::write(first.path().join("bob.json"), "[]").unwrap();
        assert_eq!(locator.locate(&user).unwrap(), first.path().join("bob.json"));
    }

    #[test]
    fn test_not_found_reports_every_candidate() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let locator =
            SpendingFileLocator::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);

        match locator.locate(&UserId::new("carol").unwrap()) {
            Err(MapError::SpendingFileNotFound { user, searched }) => {
                assert_eq!(user, "carol");
                assert_eq!(searched.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
