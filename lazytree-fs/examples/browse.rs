use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use lazytree::{LoaderOptions, TreeEvent, TreeLoader, flatten_tree};
use lazytree_fs::{FsNode, FsSource};
use tokio::task::JoinSet;

const MAX_DEPTH: usize = 2;

/// List a directory tree by firing one listing per directory at once.
///
/// Usage: `cargo run -p lazytree-fs --example browse -- [DIR]`
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let root = match std::env::args().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };

    let loader = Arc::new(TreeLoader::with_options(
        FsSource::new(&root),
        LoaderOptions {
            event_capacity: None,
            ..LoaderOptions::default()
        },
    ));
    let events = loader.events();

    loader.load_root().await?;

    // Each level is requested concurrently; completions land in any order.
    for _ in 0..MAX_DEPTH {
        let pending = unlisted_dirs(&loader.snapshot());
        if pending.is_empty() {
            break;
        }

        let mut listings = JoinSet::new();
        for dir in pending {
            let loader = Arc::clone(&loader);
            listings.spawn(async move { loader.load_children(dir).await });
        }
        while let Some(listing) = listings.join_next().await {
            if let Err(err) = listing? {
                log::warn!("{err}");
            }
        }
    }

    loader.close();

    println!("{}", heading(&root));
    for row in flatten_tree(&loader.snapshot()) {
        let marker = if row.node.is_dir() { "/" } else { "" };
        println!(
            "{}{}{marker}",
            "  ".repeat(row.depth + 1),
            row.node.name()
        );
    }

    let adopted = events
        .drain()
        .into_iter()
        .filter(|event| matches!(event, TreeEvent::Adopted { .. }))
        .count();
    println!("revision {}, adoption rounds {adopted}", loader.revision());

    Ok(())
}

fn unlisted_dirs(nodes: &[FsNode]) -> Vec<PathBuf> {
    flatten_tree(nodes)
        .into_iter()
        .filter(|row| row.node.needs_listing())
        .map(|row| row.node.path().to_path_buf())
        .collect()
}

/// Last path component of the browsed directory, or the whole path for `/`.
fn heading(root: &Path) -> String {
    root.file_name().map_or_else(
        || root.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
