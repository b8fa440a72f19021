use camino::{Utf8Path, Utf8PathBuf};
use modguard_domain::model::ViolationRecord;
use modguard_repo::ManifestError;
use modguard_types::ids;
use thiserror::Error;

/// Everything a verification run can fail with.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("the file {file} could not be found at {path}")]
    ManifestNotFound { file: String, path: Utf8PathBuf },

    #[error("could not read {path}: {source}")]
    ManifestUnreadable {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid module manifest: {source}")]
    ManifestMalformed {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// One line per forbidden edge, all collected before raising.
    #[error("{detail}")]
    BoundaryViolation {
        violations: Vec<ViolationRecord>,
        detail: String,
    },

    #[error("invalid configuration: {0:#}")]
    Config(anyhow::Error),

    #[error("could not read component inventory: {0:#}")]
    Inventory(anyhow::Error),

    #[error("write verification output: {0}")]
    Output(#[from] std::io::Error),
}

impl From<ManifestError> for VerifyError {
    fn from(err: ManifestError) -> Self {
        match err {
            ManifestError::NotFound { file, path } => VerifyError::ManifestNotFound { file, path },
            ManifestError::Unreadable { path, source } => {
                VerifyError::ManifestUnreadable { path, source }
            }
            ManifestError::Malformed { path, source } => {
                VerifyError::ManifestMalformed { path, source }
            }
        }
    }
}

impl VerifyError {
    pub fn boundary_violation(violations: Vec<ViolationRecord>) -> Self {
        let detail = violations
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        VerifyError::BoundaryViolation { violations, detail }
    }

    pub fn is_boundary_violation(&self) -> bool {
        matches!(self, VerifyError::BoundaryViolation { .. })
    }

    /// 2 for boundary violations, 1 for anything that kept the check from running.
    pub fn exit_code(&self) -> i32 {
        if self.is_boundary_violation() { 2 } else { 1 }
    }

    /// Finding code used in runtime error reports.
    pub fn finding_code(&self) -> &'static str {
        match self {
            VerifyError::ManifestNotFound { .. } => ids::CODE_MANIFEST_NOT_FOUND,
            VerifyError::ManifestMalformed { .. } => ids::CODE_MANIFEST_MALFORMED,
            _ => ids::CODE_RUNTIME_ERROR,
        }
    }

    pub fn manifest_path(&self) -> Option<&Utf8Path> {
        match self {
            VerifyError::ManifestNotFound { path, .. }
            | VerifyError::ManifestUnreadable { path, .. }
            | VerifyError::ManifestMalformed { path, .. } => Some(path),
            _ => None,
        }
    }
}
