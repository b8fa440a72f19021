use anyhow::Context;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Where to read the module manifest from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManifestLocation {
    /// A path given verbatim by the caller.
    Explicit(Utf8PathBuf),
    /// `file` in the directory `depth` levels above `base_dir`.
    Relative {
        base_dir: Utf8PathBuf,
        depth: u32,
        file: String,
    },
}

impl ManifestLocation {
    pub fn resolve(&self) -> Utf8PathBuf {
        match self {
            ManifestLocation::Explicit(path) => path.clone(),
            ManifestLocation::Relative {
                base_dir,
                depth,
                file,
            } => solution_root(base_dir, *depth).join(file),
        }
    }
}

/// Walk `depth` parents up from `base_dir`, lexically.
///
/// An absolute path stops at the filesystem root. A relative path keeps climbing past its
/// first component with `..`, so `a/b` at depth 4 is `../..`.
pub fn solution_root(base_dir: &Utf8Path, depth: u32) -> Utf8PathBuf {
    let mut dir = base_dir.to_path_buf();
    let mut ups = 0;
    for _ in 0..depth {
        match dir.components().next_back() {
            Some(Utf8Component::Normal(_)) => {
                dir.pop();
            }
            Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) => break,
            _ => ups += 1,
        }
    }
    for _ in 0..ups {
        dir.push("..");
    }
    dir
}

/// Directory containing the running executable.
pub fn executable_base_dir() -> anyhow::Result<Utf8PathBuf> {
    let exe = std::env::current_exe().context("locate current executable")?;
    let exe = Utf8PathBuf::from_path_buf(exe)
        .map_err(|p| anyhow::anyhow!("executable path is not UTF-8: {}", p.display()))?;
    exe.parent()
        .map(|p| p.to_path_buf())
        .context("executable has no parent directory")
}
