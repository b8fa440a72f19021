//! `services.json` loading.

use camino::{Utf8Path, Utf8PathBuf};
use modguard_domain::model::ModuleDescriptor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("the file {file} could not be found at {path}")]
    NotFound { file: String, path: Utf8PathBuf },

    #[error("could not read {path}: {source}")]
    Unreadable {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid module manifest: {source}")]
    Malformed {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and decode the module manifest at `path`.
pub fn load_services(path: &Utf8Path) -> Result<Vec<ModuleDescriptor>, ManifestError> {
    if !path.is_file() {
        return Err(ManifestError::NotFound {
            file: path.file_name().unwrap_or(path.as_str()).to_string(),
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| ManifestError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let modules = parse_services(&bytes).map_err(|source| ManifestError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path, modules = modules.len(), "loaded module manifest");
    Ok(modules)
}

/// Decode manifest bytes. `null` decodes to an empty list.
pub fn parse_services(bytes: &[u8]) -> Result<Vec<ModuleDescriptor>, serde_json::Error> {
    let modules: Option<Vec<ModuleDescriptor>> = serde_json::from_slice(bytes)?;
    Ok(modules.unwrap_or_default())
}
