//! Ordered probing for external executables
//!
//! Probes run lazily in order and the first existing candidate wins.

use std::path::PathBuf;

use tracing::debug;

/// One place an executable may live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Path supplied by configuration
    Explicit(PathBuf),
    /// Next to the running executable, or in its `resources/` folder
    Bundled,
    /// Current working directory
    Development,
    /// System search path
    SystemPath,
}

impl Candidate {
    fn probe(&self, tool: &str) -> Option<PathBuf> {
        let file_name = executable_name(tool);
        match self {
            Candidate::Explicit(path) => path.is_file().then(|| path.clone()),
            Candidate::Bundled => {
                let exe = std::env::current_exe().ok()?;
                let dir = exe.parent()?;
                [dir.join(&file_name), dir.join("resources").join(&file_name)]
                    .into_iter()
                    .find(|path| path.is_file())
            }
            Candidate::Development => {
                let path = std::env::current_dir().ok()?.join(&file_name);
                path.is_file().then_some(path)
            }
            Candidate::SystemPath => which::which(tool).ok(),
        }
    }
}

/// Platform file name for `tool`
pub fn executable_name(tool: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", tool)
    } else {
        tool.to_string()
    }
}

/// Finds a tool by walking its candidates in order
#[derive(Debug, Clone)]
pub struct ToolLocator {
    tool: String,
    candidates: Vec<Candidate>,
}

impl ToolLocator {
    pub fn new(tool: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        Self {
            tool: tool.into(),
            candidates,
        }
    }

    /// Configured path first, then bundled, development and system locations
    pub fn standard(tool: impl Into<String>, configured: Option<PathBuf>) -> Self {
        let mut candidates: Vec<Candidate> = configured.into_iter().map(Candidate::Explicit).collect();
        candidates.extend([Candidate::Bundled, Candidate::Development, Candidate::SystemPath]);
        Self::new(tool, candidates)
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// First candidate that exists
    pub fn locate(&self) -> Option<PathBuf> {
        let found = self
            .candidates
            .iter()
            .find_map(|candidate| candidate.probe(&self.tool));
        match &found {
            Some(path) => debug!("Located {} at {}", self.tool, path.display()),
            None => debug!("{} not found in {:?}", self.tool, self.candidates),
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_standard_order() {
        let locator = ToolLocator::standard("ffmpeg", Some(PathBuf::from("/opt/ffmpeg")));
        assert_eq!(
            locator.candidates(),
            &[
                Candidate::Explicit(PathBuf::from("/opt/ffmpeg")),
                Candidate::Bundled,
                Candidate::Development,
                Candidate::SystemPath,
            ]
        );
        assert_eq!(ToolLocator::standard("ffmpeg", None).candidates().len(), 3);
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::write(&first, b"").unwrap();
        fs::write(&second, b"").unwrap();

        let locator = ToolLocator::new(
            "ffmpeg",
            vec![
                Candidate::Explicit(dir.path().join("missing")),
                Candidate::Explicit(first.clone()),
                Candidate::Explicit(second),
            ],
        );
        assert_eq!(locator.locate(), Some(first));
    }

    #[test]
    fn test_directory_is_not_an_executable() {
        let dir = TempDir::new().unwrap();
        let locator = ToolLocator::new("ffmpeg", vec![Candidate::Explicit(dir.path().to_path_buf())]);
        assert_eq!(locator.locate(), None);
    }

    #[test]
    fn test_nothing_found() {
        let locator = ToolLocator::new("definitely-not-a-real-tool-xyz", vec![Candidate::SystemPath]);
        assert_eq!(locator.locate(), None);
    }
}
