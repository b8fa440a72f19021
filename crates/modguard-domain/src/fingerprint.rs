use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a boundary finding.
///
/// Identity fields: check_id, code, violating component, contract id.
pub fn fingerprint_for_edge(check_id: &str, code: &str, component: &str, contract: &str) -> String {
    let canonical = [check_id, code, component, contract].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
