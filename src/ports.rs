//! Port override parsing and application
//!
//! A `--port SERVICE:HOST_PORT:CONTAINER_PORT` token replaces the published
//! side of the matching binding on a service, or appends a new tcp binding
//! when the service has none for that container port.

use crate::compose::{PortBinding, Project};
use crate::error::{Result, SkiffError};

/// A decoded `--port` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortOverride {
    pub service: String,
    /// Kept as a string; the compose tool performs its own range validation
    pub host_port: String,
    pub target: u32,
}

impl PortOverride {
    /// Parse a `SERVICE:HOST_PORT:CONTAINER_PORT` token
    ///
    /// The service name is any non-empty sequence without a colon; both port
    /// fields must be purely decimal. No whitespace trimming.
    pub fn parse(token: &str) -> Result<Self> {
        let invalid = |reason: &str| SkiffError::InvalidPortMapping {
            token: token.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = token.splitn(3, ':');
        let (service, host_port, container_port) =
            match (parts.next(), parts.next(), parts.next()) {
                (Some(service), Some(host), Some(container)) => (service, host, container),
                _ => return Err(invalid("expected SERVICE:HOST_PORT:CONTAINER_PORT")),
            };

        if service.is_empty() {
            return Err(invalid("service name is empty"));
        }
        if !is_decimal(host_port) {
            return Err(invalid("host port is not a number"));
        }
        if !is_decimal(container_port) {
            return Err(invalid("container port is not a number"));
        }

        let target: u32 = container_port
            .parse()
            .map_err(|_| invalid("container port is out of range"))?;

        Ok(Self {
            service: service.to_string(),
            host_port: host_port.to_string(),
            target,
        })
    }
}

fn is_decimal(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

/// Apply overrides to an already-filtered project
///
/// Overrides are processed in token order, so a later override for the same
/// service and container port wins. Returns the names of services that were
/// requested but are not present, sorted and deduplicated; those overrides
/// are dropped, the rest still apply.
pub fn apply_overrides(project: &mut Project, overrides: &[PortOverride]) -> Vec<String> {
    let mut missing = Vec::new();

    for override_ in overrides {
        let Some(service) = project.services.get_mut(&override_.service) else {
            missing.push(override_.service.clone());
            continue;
        };

        match service
            .ports
            .iter_mut()
            .find(|binding| binding.target == override_.target)
        {
            // Replace only the published side; position and protocol stay
            Some(binding) => binding.published = Some(override_.host_port.clone()),
            None => service
                .ports
                .push(PortBinding::tcp(override_.target, override_.host_port.clone())),
        }
    }

    missing.sort();
    missing.dedup();
    missing
}
