use crate::merge::error::{MergeError, MergeResult};

const MAX_PATH_LENGTH: usize = 4096;
const MAX_NAME_LENGTH: usize = 255;

pub fn normalize_path(path: &str) -> MergeResult<String> {
    if path.is_empty() {
        return Err(MergeError::InvalidPath("Empty path".to_string()));
    }

    if path.contains('\0') {
        return Err(MergeError::InvalidPath("Path contains NULL character".to_string()));
    }

    if path.len() > MAX_PATH_LENGTH {
        return Err(MergeError::PathTooLong(path.len()));
    }

    if !path.starts_with('/') {
        return Err(MergeError::InvalidPath(format!("Path must start with /: {path}")));
    }

    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    for part in &parts {
        if part.len() > MAX_NAME_LENGTH {
            return Err(MergeError::NameTooLong(part.len()));
        }
    }

    Ok(format!("/{}", parts.join("/")))
}

/// Normalize a path relative to some root. Leading and trailing slashes are
/// dropped; the empty string denotes the root itself.
pub fn normalize_relative(relative: &str) -> MergeResult<String> {
    if relative.contains('\0') {
        return Err(MergeError::InvalidPath("Path contains NULL character".to_string()));
    }

    let parts: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
    if parts.iter().any(|p| *p == "." || *p == "..") {
        return Err(MergeError::InvalidPath(format!("Relative path escapes its root: {relative}")));
    }

    Ok(parts.join("/"))
}

/// Join a root and a relative path. An empty relative path yields the root.
pub fn join(root: &str, relative: &str) -> String {
    let root = root.trim_end_matches('/');
    let relative = relative.trim_matches('/');
    match (root.is_empty(), relative.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{relative}"),
        (false, true) => root.to_string(),
        (false, false) => format!("{root}/{relative}"),
    }
}

/// Parent of an absolute path; `None` for the root.
pub fn parent(path: &str) -> Option<String> {
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        return None;
    }

    match path.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(pos) => Some(path[..pos].to_string()),
        None => None,
    }
}

/// True if `path` is `root` or lies below it, compared segment-wise.
pub fn is_under(path: &str, root: &str) -> bool {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return path.starts_with('/');
    }
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// `path` relative to `root`, or `None` if it does not live under `root`.
pub fn relative_to<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    if !is_under(path, root) {
        return None;
    }
    let root = root.trim_end_matches('/');
    Some(path[root.len()..].trim_matches('/'))
}
