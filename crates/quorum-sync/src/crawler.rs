//! Bounded recursive folder crawling.

use crate::error::{SyncError, SyncResult};
use futures_util::future::BoxFuture;
use quorum_core::{is_folder, LeafFile, RemoteEntry, StorageBrowser};
use tracing::debug;

/// Walk a folder tree to `max_depth`, flattening it into leaf file
/// descriptors. Subtrees deeper than `max_depth` are silently skipped.
/// Within one listing, source order is preserved.
pub async fn crawl(
    browser: &dyn StorageBrowser,
    root_folder_id: &str,
    max_depth: u32,
) -> SyncResult<Vec<LeafFile>> {
    let mut files = Vec::new();
    walk(browser, root_folder_id.to_string(), 0, max_depth, &mut files).await?;
    Ok(files)
}

fn walk<'a>(
    browser: &'a dyn StorageBrowser,
    folder_id: String,
    depth: u32,
    max_depth: u32,
    files: &'a mut Vec<LeafFile>,
) -> BoxFuture<'a, SyncResult<()>> {
    Box::pin(async move {
        // Page this folder's listing to exhaustion before descending.
        let entries = list_folder(browser, &folder_id).await?;

        for entry in entries {
            if is_folder(&entry) {
                if depth + 1 > max_depth {
                    debug!(
                        "Skipping folder '{}' beyond max depth {}",
                        entry.name, max_depth
                    );
                    continue;
                }
                walk(browser, entry.id, depth + 1, max_depth, files).await?;
            } else {
                files.push(leaf_from_entry(entry, &folder_id));
            }
        }

        Ok(())
    })
}

/// Collect every page of one folder's listing.
async fn list_folder(
    browser: &dyn StorageBrowser,
    folder_id: &str,
) -> SyncResult<Vec<RemoteEntry>> {
    let mut entries = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let listing = browser
            .list_children(folder_id, page_token.as_deref())
            .await
            .map_err(|e| SyncError::Storage(e.to_string()))?;

        entries.extend(listing.entries);

        match listing.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(entries)
}

fn leaf_from_entry(entry: RemoteEntry, parent_folder_id: &str) -> LeafFile {
    LeafFile {
        id: entry.id,
        name: entry.name,
        mime_type: entry.mime_type,
        parent_folder_id: parent_folder_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeBrowser;

    #[tokio::test]
    async fn test_crawl_flattens_tree() {
        let mut browser = FakeBrowser::new();
        browser.add_file("root", "f1", "a.pdf", "application/pdf", None);
        browser.add_folder("root", "sub", "2023");
        browser.add_file("sub", "f2", "b.pdf", "application/pdf", None);

        let files = crawl(&browser, "root", 3).await.unwrap();
        let ids: Vec<&str> = files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "f2"]);
        assert_eq!(files[1].parent_folder_id, "sub");
    }

    #[tokio::test]
    async fn test_crawl_respects_max_depth() {
        let mut browser = FakeBrowser::new();
        browser.add_file("root", "f0", "top.pdf", "application/pdf", None);
        browser.add_folder("root", "level1", "Level 1");
        browser.add_file("level1", "f1", "mid.pdf", "application/pdf", None);
        browser.add_folder("level1", "level2", "Level 2");
        browser.add_file("level2", "f2", "deep.pdf", "application/pdf", None);

        // Depth 1: the level-2 subtree is skipped without error
        let files = crawl(&browser, "root", 1).await.unwrap();
        let ids: Vec<&str> = files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f0", "f1"]);

        // Depth 0: only the root's own files
        let files = crawl(&browser, "root", 0).await.unwrap();
        let ids: Vec<&str> = files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f0"]);
    }

    #[tokio::test]
    async fn test_crawl_pages_to_exhaustion() {
        let mut browser = FakeBrowser::new();
        for i in 0..5 {
            browser.add_file(
                "root",
                &format!("f{}", i),
                &format!("{}.pdf", i),
                "application/pdf",
                None,
            );
        }
        browser.set_page_size(2);

        let files = crawl(&browser, "root", 1).await.unwrap();
        assert_eq!(files.len(), 5);
        // 5 entries at 2 per page means 3 listing calls
        assert_eq!(browser.listing_calls(), 3);
    }

    #[tokio::test]
    async fn test_crawl_propagates_listing_failure() {
        let mut browser = FakeBrowser::new();
        browser.add_folder("root", "bad", "Broken");
        browser.fail_listing("bad");

        let result = crawl(&browser, "root", 2).await;
        assert!(result.is_err());
    }
}
