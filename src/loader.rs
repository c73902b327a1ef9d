//! Compose file resolution and loading
//!
//! Resolution probes the two conventional file names through an injected
//! existence oracle so the logic stays testable without a filesystem.
//! Loading reads the file, applies compose-style variable interpolation
//! (OS environment over `.env` over inline defaults) and parses the YAML.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::compose::Project;
use crate::error::{Result, SkiffError};

/// Conventional file names probed when -f is not given, in order
pub const DEFAULT_COMPOSE_FILES: [&str; 2] = ["docker-compose.yml", "docker-compose.yaml"];

/// Resolve which compose file to use
///
/// An explicit -f path wins without an existence check (the load reports a
/// precise read error later). Otherwise the default names are probed in the
/// working directory.
pub fn resolve_compose_file<F>(explicit: Option<PathBuf>, file_exists: F) -> Result<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    if let Some(path) = explicit {
        return Ok(path);
    }

    DEFAULT_COMPOSE_FILES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| file_exists(candidate))
        .ok_or(SkiffError::ComposeFileNotFound)
}

/// Load and parse a compose file, with variable interpolation applied
pub fn load(path: &Path) -> Result<Project> {
    let text = fs::read_to_string(path).map_err(|err| SkiffError::ComposeReadFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;

    let project_dir = match path.parent() {
        Some(parent) if parent != Path::new("") => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let env = environment(&project_dir);
    let interpolated = interpolate(&text, &env);

    serde_yaml::from_str(&interpolated).map_err(|err| SkiffError::ComposeParseFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

/// Variables visible to interpolation: `.env` from the project directory,
/// shadowed by the OS environment
fn environment(project_dir: &Path) -> HashMap<String, String> {
    let mut vars: HashMap<String, String> = HashMap::new();

    if let Ok(text) = fs::read_to_string(project_dir.join(".env")) {
        vars.extend(parse_dot_env(&text));
    }
    vars.extend(std::env::vars());

    vars
}

/// Minimal `.env` reader: KEY=VALUE lines, `#` comments, optional `export `
/// prefix and matching single/double quotes
fn parse_dot_env(text: &str) -> Vec<(String, String)> {
    let mut vars = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);

        vars.push((key.trim().to_string(), value.to_string()));
    }

    vars
}

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\$|([A-Za-z_][A-Za-z0-9_]*)|\{([A-Za-z_][A-Za-z0-9_]*)(?:(:?-)([^}]*))?\})")
        .expect("variable pattern is valid")
});

/// Substitute `$VAR`, `${VAR}`, `${VAR-default}`, `${VAR:-default}` and the
/// `$$` escape. Unset variables without a default expand to the empty
/// string; malformed expressions are left untouched for the compose tool.
fn interpolate(text: &str, env: &HashMap<String, String>) -> String {
    VARIABLE
        .replace_all(text, |caps: &Captures| {
            if let Some(name) = caps.get(1) {
                return env.get(name.as_str()).cloned().unwrap_or_default();
            }

            let Some(name) = caps.get(2) else {
                // The `$$` escape
                return "$".to_string();
            };

            let value = env.get(name.as_str());
            match (caps.get(3).map(|m| m.as_str()), caps.get(4)) {
                // ${VAR:-default}: default when unset or empty
                (Some(":-"), Some(default)) => match value {
                    Some(v) if !v.is_empty() => v.clone(),
                    _ => default.as_str().to_string(),
                },
                // ${VAR-default}: default only when unset
                (Some("-"), Some(default)) => match value {
                    Some(v) => v.clone(),
                    None => default.as_str().to_string(),
                },
                _ => value.cloned().unwrap_or_default(),
            }
        })
        .into_owned()
}
