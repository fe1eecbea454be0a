use std::env;
use std::path::{Path, PathBuf};

/// Locates an executable by walking the `PATH` directories.
///
/// Names containing a path separator are checked as given. Never errors: any
/// lookup problem is simply "not available".
pub fn find_in_path(name: &str) -> Option<PathBuf> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|full| is_executable(full))
}

/// Resolves a tool executable, honoring an environment-variable override
/// before falling back to the default candidate names.
///
/// The override value may be a bare name or a full path; either way it is
/// still probed for existence so availability stays truthful.
pub fn resolve_executable(env_override: &str, candidates: &[&str]) -> Option<PathBuf> {
    if let Ok(value) = env::var(env_override) {
        if !value.trim().is_empty() {
            return find_in_path(value.trim());
        }
    }
    candidates.iter().find_map(|name| find_in_path(name))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
