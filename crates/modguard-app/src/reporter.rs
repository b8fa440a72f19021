use crate::VerifyError;
use modguard_domain::model::{ModuleDescriptor, ViolationRecord};
use std::io::Write;

/// Console side of a verification run.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn no_microservices(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "There are no microservices in your project.")
    }

    /// Name every microservice module, then announce the dependency scan.
    pub fn announce(&mut self, microservices: &[ModuleDescriptor]) -> std::io::Result<()> {
        for m in microservices {
            writeln!(self.out, "'{}' is a microservice.", m.name)?;
        }
        writeln!(self.out, "Starting to check for dependencies...")
    }

    /// Print success, or raise every violation at once.
    pub fn report(&mut self, violations: &[ViolationRecord]) -> Result<(), VerifyError> {
        if !violations.is_empty() {
            return Err(VerifyError::boundary_violation(violations.to_vec()));
        }
        writeln!(self.out, "Successfully verified all module dependencies!")?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
