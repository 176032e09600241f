//! Local source path → canonical remote path.
//!
//! The mapping is purely lexical: no filesystem access, no symlink
//! resolution. `\` and `/` are both treated as separators so a path written
//! on Windows maps to the same remote path as its POSIX spelling.
//!
//! ```text
//! root   = /repo/f
//! source = /repo/f/einstein_kids/shared/upsert_lead.py
//! prefix = u/admin
//! result = u/admin/einstein_kids/shared/upsert_lead
//! ```

use std::path::Path;

use crate::error::ScriptError;
use crate::types::RemotePath;

/// Map `source` to `<prefix>/<path relative to root without extension>`.
///
/// Fails with [`ScriptError::OutOfScope`] unless `source` lies strictly
/// inside `root`.
pub fn normalize_script_path(
    source: &Path,
    root: &Path,
    prefix: &str,
) -> Result<RemotePath, ScriptError> {
    let out_of_scope = || ScriptError::OutOfScope {
        path: source.to_path_buf(),
        root: root.to_path_buf(),
    };

    let (source_abs, source_segments) = segments(&source.to_string_lossy());
    let (root_abs, root_segments) = segments(&root.to_string_lossy());

    if source_abs != root_abs
        || source_segments.len() <= root_segments.len()
        || !source_segments.starts_with(&root_segments)
    {
        return Err(out_of_scope());
    }

    let mut relative = source_segments[root_segments.len()..].to_vec();
    if relative.iter().any(|s| s == "..") {
        return Err(out_of_scope());
    }
    if let Some(last) = relative.last_mut() {
        strip_extension(last);
    }

    let prefix = prefix.trim_end_matches('/');
    Ok(RemotePath(format!("{prefix}/{}", relative.join("/"))))
}

/// Split on either separator, dropping `.` and folding `..` where possible.
fn segments(raw: &str) -> (bool, Vec<String>) {
    let unified = raw.replace('\\', "/");
    let absolute = unified.starts_with('/');
    let mut out: Vec<String> = Vec::new();
    for part in unified.split('/') {
        match part {
            "" | "." => {}
            ".." => match out.last() {
                Some(last) if last != ".." => {
                    out.pop();
                }
                // `/..` is `/`.
                _ if absolute => {}
                _ => out.push("..".to_string()),
            },
            other => out.push(other.to_string()),
        }
    }
    (absolute, out)
}

fn strip_extension(name: &mut String) {
    if let Some(idx) = name.rfind('.') {
        if idx > 0 {
            name.truncate(idx);
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn norm(source: &str, root: &str) -> Result<RemotePath, ScriptError> {
        normalize_script_path(Path::new(source), Path::new(root), "u/admin")
    }

    #[test]
    fn nested_file_maps_under_prefix() {
        let path = norm("/repo/f/a/x.py", "/repo/f").expect("normalize");
        assert_eq!(path.as_str(), "u/admin/a/x");
    }

    #[test]
    fn only_last_extension_is_stripped() {
        let path = norm("/repo/f/a/x.v2.py", "/repo/f").expect("normalize");
        assert_eq!(path.as_str(), "u/admin/a/x.v2");
    }

    #[test]
    fn dotfile_keeps_its_name() {
        let path = norm("/repo/f/a/.hidden", "/repo/f").expect("normalize");
        assert_eq!(path.as_str(), "u/admin/a/.hidden");
    }

    #[test]
    fn backslashes_match_forward_slashes() {
        let forward = norm("C:/repo/f/shared/job.py", "C:/repo/f").expect("forward");
        let back = norm(r"C:\repo\f\shared\job.py", r"C:\repo\f").expect("back");
        let mixed = norm(r"C:/repo\f/shared\job.py", "C:/repo/f").expect("mixed");
        assert_eq!(forward, back);
        assert_eq!(forward, mixed);
        assert_eq!(forward.as_str(), "u/admin/shared/job");
    }

    #[test]
    fn dot_segments_are_folded() {
        let path = norm("/repo/f/./a/../b/x.py", "/repo/f/").expect("normalize");
        assert_eq!(path.as_str(), "u/admin/b/x");
    }

    #[test]
    fn sibling_directory_is_out_of_scope() {
        let err = norm("/repo/g/x.py", "/repo/f").unwrap_err();
        assert!(matches!(err, ScriptError::OutOfScope { .. }), "got: {err}");
    }

    #[test]
    fn name_prefix_is_not_containment() {
        let err = norm("/repo/foo/x.py", "/repo/f").unwrap_err();
        assert!(matches!(err, ScriptError::OutOfScope { .. }));
    }

    #[test]
    fn escaping_with_dotdot_is_out_of_scope() {
        let err = norm("/repo/f/../secrets/x.py", "/repo/f").unwrap_err();
        assert!(matches!(err, ScriptError::OutOfScope { .. }));
    }

    #[test]
    fn root_itself_is_out_of_scope() {
        let err = norm("/repo/f", "/repo/f").unwrap_err();
        assert!(matches!(err, ScriptError::OutOfScope { .. }));
    }

    #[test]
    fn relative_source_against_absolute_root_is_out_of_scope() {
        let err = norm("f/a/x.py", "/repo/f").unwrap_err();
        assert!(matches!(err, ScriptError::OutOfScope { .. }));
    }

    #[test]
    fn out_of_scope_message_names_the_file() {
        let err = normalize_script_path(
            &PathBuf::from("/elsewhere/x.py"),
            Path::new("/repo/f"),
            "u/admin",
        )
        .unwrap_err();
        assert!(err.to_string().contains("/elsewhere/x.py"));
    }
}
