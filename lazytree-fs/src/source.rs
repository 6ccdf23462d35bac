use std::future::Future;
use std::path::{Path, PathBuf};

use lazytree::ChildSource;

use crate::errors::FsError;
use crate::model::FsNode;

/// Child source listing directories below a fixed root.
///
/// The root request lists the root directory itself; child requests list
/// the directory whose path is the parent id.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ChildSource for FsSource {
    type Node = FsNode;
    type Error = FsError;

    fn fetch_children(
        &self,
        parent: Option<PathBuf>,
    ) -> impl Future<Output = Result<Vec<FsNode>, FsError>> + Send {
        let directory = parent.unwrap_or_else(|| self.root.clone());
        async move { read_dir_nodes(&directory).await }
    }
}

/// Load direct children of a file system directory, sorted for display.
///
/// Entries whose metadata cannot be read are skipped.
pub async fn read_dir_nodes(path: &Path) -> Result<Vec<FsNode>, FsError> {
    let read_dir_error = |source| FsError::ReadDir {
        path: path.to_path_buf(),
        source,
    };

    let mut entries =
        tokio::fs::read_dir(path).await.map_err(read_dir_error)?;
    let mut nodes = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(err) => {
                log::warn!("failed to read entry in {}: {err}", path.display());
                continue;
            },
        };

        let file_type = match entry.file_type().await {
            Ok(file_type) => file_type,
            Err(err) => {
                log::warn!("failed to read entry type: {err}");
                continue;
            },
        };

        let name = entry.file_name().to_string_lossy().to_string();
        nodes.push(FsNode::new(name, entry.path(), file_type.is_dir()));
    }

    nodes.sort();
    log::trace!("listed {} entries in {}", nodes.len(), path.display());

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use lazytree::{ChildSource, TreeLoader, TreeNode};

    use super::{FsSource, read_dir_nodes};
    use crate::errors::FsError;

    #[tokio::test]
    async fn given_directory_with_files_when_loaded_then_nodes_are_returned() {
        let root = test_temp_dir("load_directory");
        fs::create_dir_all(root.join("b-dir"))
            .expect("folder should be created");
        fs::write(root.join("a.txt"), "ok").expect("file should be created");

        let nodes = read_dir_nodes(&root).await.expect("directory should load");

        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].is_dir());
        assert_eq!(nodes[1].name(), "a.txt");

        fs::remove_dir_all(root).expect("test directory should be removed");
    }

    #[tokio::test]
    async fn given_missing_directory_when_fetched_then_error_names_the_path() {
        let root = test_temp_dir("missing_directory");
        let missing = root.join("nope");
        let source = FsSource::new(&root);

        let err = source
            .fetch_children(Some(missing.clone()))
            .await
            .expect_err("listing should fail");

        let FsError::ReadDir { path, .. } = err;
        assert_eq!(path, missing);

        fs::remove_dir_all(root).expect("test directory should be removed");
    }

    #[tokio::test]
    async fn given_nested_directory_when_loaded_out_of_order_then_tree_is_assembled()
     {
        let root = test_temp_dir("out_of_order");
        fs::create_dir_all(root.join("src/bin"))
            .expect("folders should be created");
        fs::write(root.join("src/bin/main.rs"), "").expect("file is created");
        let loader = TreeLoader::new(FsSource::new(&root));

        // Deepest listing first: both parents are still unknown.
        loader
            .load_children(root.join("src/bin"))
            .await
            .expect("bin lists");
        loader.load_children(root.join("src")).await.expect("src lists");
        assert!(loader.snapshot().is_empty());
        assert_eq!(loader.orphan_count(), 2);

        let roots = loader.load_root().await.expect("root lists");

        let roots = roots.completed().expect("session is open");
        assert_eq!(roots.len(), 1);
        assert_eq!(loader.orphan_count(), 0);
        let snapshot = loader.snapshot();
        let src = &snapshot[0];
        assert_eq!(src.name(), "src");
        let bin = &src.children().expect("src is listed")[0];
        assert_eq!(bin.name(), "bin");
        let main = &bin.children().expect("bin is listed")[0];
        assert_eq!(main.name(), "main.rs");
        assert!(!main.needs_listing());

        fs::remove_dir_all(root).expect("test directory should be removed");
    }

    fn test_temp_dir(test_name: &str) -> PathBuf {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be monotonic")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "lazytree-fs-{test_name}-{stamp}-{}",
            std::process::id()
        ));

        fs::create_dir_all(&dir).expect("test directory should be created");
        dir
    }
}
