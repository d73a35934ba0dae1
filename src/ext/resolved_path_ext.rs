use std::path::{Component, Path, PathBuf};

/// Resolves `path` to an absolute, normalized form for display.
///
/// Existing paths are canonicalized. For a path that does not exist yet (a
/// dry-run target, or a file about to be written) the parent is canonicalized
/// when possible and the final component appended; otherwise the path is made
/// absolute against the current directory and `.`/`..` are folded lexically.
pub fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    if let (Some(parent), Some(name)) = (path.parent(), path.file_name())
        && let Ok(canonical_parent) = parent.canonicalize()
    {
        return canonical_parent.join(name);
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(current_dir) => current_dir.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    normalize_path(&absolute)
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

pub trait ResolvedPathExt {
    fn resolved(&self) -> PathBuf;

    fn resolved_display(&self) -> String {
        self.resolved().display().to_string()
    }
}

impl ResolvedPathExt for Path {
    fn resolved(&self) -> PathBuf {
        resolve_path(self)
    }
}

impl ResolvedPathExt for PathBuf {
    fn resolved(&self) -> PathBuf {
        resolve_path(self)
    }
}
