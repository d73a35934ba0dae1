use std::path::{Path, PathBuf};

use hashlink::LinkedHashMap;
use snafu::{Snafu, ensure};

/// Children of a directory node, kept in declaration order.
pub type Entries = LinkedHashMap<String, TreeNode>;

/// A node of the tree descriptor: either a directory holding named children
/// or a file holding its full contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    File { contents: String },
    Directory { children: Entries },
}

impl TreeNode {
    pub fn file(contents: impl Into<String>) -> Self {
        TreeNode::File {
            contents: contents.into(),
        }
    }

    /// A file node that materializes as an empty file.
    pub fn empty_file() -> Self {
        Self::file(String::new())
    }

    pub fn directory() -> Self {
        TreeNode::Directory {
            children: Entries::new(),
        }
    }

    /// Inserts `node` as a direct child of this directory.
    pub fn try_insert(&mut self, name: impl Into<String>, node: TreeNode) -> Result<(), TreeError> {
        let name = name.into();
        match self {
            TreeNode::Directory { children } => insert_entry(children, name, node),
            TreeNode::File { .. } => InsertIntoFileSnafu { name }.fail(),
        }
    }

    /// Builder form of [`TreeNode::try_insert`].
    pub fn with(mut self, name: impl Into<String>, node: TreeNode) -> Result<Self, TreeError> {
        self.try_insert(name, node)?;
        Ok(self)
    }
}

/// The top-level mapping handed to the materializer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeDescriptor {
    entries: Entries,
}

impl TreeDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_insert(&mut self, name: impl Into<String>, node: TreeNode) -> Result<(), TreeError> {
        insert_entry(&mut self.entries, name.into(), node)
    }

    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens the descriptor into `(relative path, node)` pairs, depth-first,
    /// parents before their children.
    pub fn walk(&self) -> Vec<(PathBuf, &TreeNode)> {
        let mut out = Vec::new();
        walk_entries(Path::new(""), &self.entries, &mut out);
        out
    }

    /// Returns `(directories, files)` over the whole tree.
    pub fn counts(&self) -> (usize, usize) {
        self.walk()
            .iter()
            .fold((0, 0), |(dirs, files), (_, node)| match node {
                TreeNode::Directory { .. } => (dirs + 1, files),
                TreeNode::File { .. } => (dirs, files + 1),
            })
    }
}

fn walk_entries<'a>(prefix: &Path, entries: &'a Entries, out: &mut Vec<(PathBuf, &'a TreeNode)>) {
    for (name, node) in entries {
        let path = prefix.join(name);
        out.push((path.clone(), node));
        if let TreeNode::Directory { children } = node {
            walk_entries(&path, children, out);
        }
    }
}

fn insert_entry(entries: &mut Entries, name: String, node: TreeNode) -> Result<(), TreeError> {
    validate_segment(&name)?;
    ensure!(!entries.contains_key(&name), DuplicateEntrySnafu { name });
    entries.insert(name, node);
    Ok(())
}

/// Checks that `name` can be joined onto a base path as exactly one segment.
pub fn validate_segment(name: &str) -> Result<(), TreeError> {
    let is_single_segment = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    ensure!(
        is_single_segment,
        InvalidSegmentSnafu {
            name: name.to_string()
        }
    );
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum TreeError {
    #[snafu(display("'{}' is not a single path segment", name))]
    InvalidSegmentError { name: String },
    #[snafu(display("'{}' is defined more than once in the same directory", name))]
    DuplicateEntryError { name: String },
    #[snafu(display("Cannot insert '{}' into a file", name))]
    InsertIntoFileError { name: String },
}
