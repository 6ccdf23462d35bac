use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use lazytree::TreeNode;

/// File system entry assembled into a lazily loaded tree.
///
/// Directories start unresolved; files are resolved with no children.
#[derive(Debug, Clone)]
pub struct FsNode {
    name: String,
    path: PathBuf,
    is_dir: bool,
    children: Option<Vec<FsNode>>,
}

impl FsNode {
    /// Create a node for the entry at `path`.
    pub fn new(name: String, path: PathBuf, is_dir: bool) -> Self {
        Self {
            name,
            path,
            is_dir,
            children: if is_dir { None } else { Some(Vec::new()) },
        }
    }

    /// Return display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the file system path, also used as the node id.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Return whether a directory's listing still has to be fetched.
    pub fn needs_listing(&self) -> bool {
        self.is_dir && self.children.is_none()
    }
}

impl TreeNode for FsNode {
    type Id = PathBuf;

    fn id(&self) -> &PathBuf {
        &self.path
    }

    fn children(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }

    fn take_children(&mut self) -> Option<Vec<Self>> {
        self.children.take()
    }

    fn set_children(&mut self, children: Option<Vec<Self>>) {
        self.children = children;
    }
}

impl Ord for FsNode {
    fn cmp(&self, other: &Self) -> Ordering {
        match (!self.is_dir).cmp(&(!other.is_dir)) {
            Ordering::Equal => match compare_names(self.name(), other.name()) {
                Ordering::Equal => self.path.cmp(&other.path),
                order => order,
            },
            order => order,
        }
    }
}

impl PartialOrd for FsNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FsNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FsNode {}

/// Case-insensitive comparison with case-sensitive tiebreak.
fn compare_names(left: &str, right: &str) -> Ordering {
    let left_fold = left.bytes().map(|byte| byte.to_ascii_lowercase());
    let right_fold = right.bytes().map(|byte| byte.to_ascii_lowercase());
    match left_fold.cmp(right_fold) {
        Ordering::Equal => left.cmp(right),
        order => order,
    }
}
