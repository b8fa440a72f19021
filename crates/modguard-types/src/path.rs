use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Repo-relative path used in finding locations.
///
/// Always forward slashes, never a leading `./`, never empty (`.` stands for the root).
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct RepoPath(String);

impl Default for RepoPath {
    fn default() -> Self {
        RepoPath::new(".")
    }
}

impl RepoPath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().replace('\\', "/");
        while let Some(rest) = v.strip_prefix("./") {
            v = rest.to_string();
        }
        if v.is_empty() {
            v = ".".to_string();
        }
        Self(v)
    }

    /// Express `abs` relative to `root`. Paths outside `root` are kept as given.
    pub fn relative_to(root: &Utf8Path, abs: &Utf8Path) -> Self {
        match abs.strip_prefix(root) {
            Ok(rel) => RepoPath::new(rel.as_str()),
            Err(_) => RepoPath::new(abs.as_str()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_utf8_pathbuf(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.0.clone())
    }

    /// Directory part of the path; `.` for top-level files.
    pub fn parent(&self) -> RepoPath {
        match Utf8Path::new(self.as_str()).parent() {
            Some(p) => RepoPath::new(p.as_str()),
            None => RepoPath::default(),
        }
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Utf8Path> for RepoPath {
    fn from(value: &Utf8Path) -> Self {
        RepoPath::new(value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_dot_prefix() {
        assert_eq!(RepoPath::new(".\\crates\\a\\Cargo.toml").as_str(), "crates/a/Cargo.toml");
        assert_eq!(RepoPath::new("././Cargo.toml").as_str(), "Cargo.toml");
        assert_eq!(RepoPath::new("").as_str(), ".");
    }

    #[test]
    fn relative_to_strips_root() {
        let root = Utf8Path::new("/work/app");
        let abs = Utf8Path::new("/work/app/crates/orders/Cargo.toml");
        assert_eq!(
            RepoPath::relative_to(root, abs).as_str(),
            "crates/orders/Cargo.toml"
        );

        let outside = Utf8Path::new("/elsewhere/Cargo.toml");
        assert_eq!(
            RepoPath::relative_to(root, outside).as_str(),
            "/elsewhere/Cargo.toml"
        );
    }

    #[test]
    fn parent_of_top_level_file_is_root() {
        assert_eq!(RepoPath::new("Cargo.toml").parent().as_str(), ".");
        assert_eq!(
            RepoPath::new("crates/orders/Cargo.toml").parent().as_str(),
            "crates/orders"
        );
    }
}
