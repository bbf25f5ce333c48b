/// Feed Builder
///
/// Resolves a viewpoint to a base set of posts, orders it newest-first, and
/// slices it into fixed-size pages. The `Global` viewpoint is memoized per
/// page in the timeline cache; every other viewpoint is computed on demand.
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use timeline_cache::TtlCache;

use crate::domain::{Author, Group, Identity, Post};
use crate::error::{AppError, Result};
use crate::repository::{BlogStore, PostFilter};

/// The selection criterion for a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewpoint {
    /// Every post on the platform
    Global,
    /// Posts of the group with this slug
    ByGroup(String),
    /// Posts of the author with this username
    ByAuthor(String),
    /// Posts of the authors the viewer follows
    ByFollowing(Identity),
}

/// One page of a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub total_items: i64,
    pub page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Permissive page-number parsing: non-numeric or non-positive input means
/// page 1. Clamping to the last page happens later, once the total is known.
pub fn page_from_query(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|page| *page >= 1)
        .map(|page| page.min(i64::from(u32::MAX)) as u32)
        .unwrap_or(1)
}

pub struct FeedService {
    store: Arc<dyn BlogStore>,
    cache: Arc<TtlCache<u32, FeedPage>>,
    page_size: u32,
}

impl FeedService {
    pub fn new(
        store: Arc<dyn BlogStore>,
        cache: Arc<TtlCache<u32, FeedPage>>,
        page_size: u32,
    ) -> Self {
        Self {
            store,
            cache,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub async fn resolve_group(&self, slug: &str) -> Result<Group> {
        self.store
            .find_group_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group '{slug}'")))
    }

    pub async fn resolve_author(&self, username: &str) -> Result<Author> {
        self.store
            .find_author_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("author '{username}'")))
    }

    /// Produce one page of the feed selected by `viewpoint`.
    ///
    /// `page` is 1-based; anything past the last page returns the last page.
    pub async fn build_feed(&self, viewpoint: &Viewpoint, page: u32) -> Result<FeedPage> {
        let page = page.max(1);
        match viewpoint {
            Viewpoint::Global => {
                if let Some(cached) = self.cache.get(&page) {
                    debug!(page, "global feed cache hit");
                    return Ok(cached);
                }
                debug!(page, "global feed cache miss");
                let built = self.assemble(&PostFilter::All, page).await?;
                // Key by the clamped page, so out-of-range requests all land
                // on the last page's entry and the key space stays bounded by
                // the real page count.
                self.cache.insert(built.page, built.clone());
                Ok(built)
            }
            Viewpoint::ByGroup(slug) => {
                let group = self.resolve_group(slug).await?;
                self.assemble(&PostFilter::Group(group.id), page).await
            }
            Viewpoint::ByAuthor(username) => {
                let author = self.resolve_author(username).await?;
                self.assemble(&PostFilter::Author(author.id), page).await
            }
            Viewpoint::ByFollowing(identity) => {
                let viewer = identity.user_id().ok_or_else(|| {
                    AppError::Unauthorized("the follow feed requires a signed-in viewer".into())
                })?;
                let authors = self.store.following_ids(viewer).await?;
                self.assemble(&PostFilter::Authors(authors), page).await
            }
        }
    }

    async fn assemble(&self, filter: &PostFilter, requested_page: u32) -> Result<FeedPage> {
        let total_items = self.store.count_posts(filter).await?;
        let page_size = i64::from(self.page_size);
        // An empty set still has one (empty) page.
        let total_pages = (((total_items + page_size - 1) / page_size).max(1)) as u32;
        let page = requested_page.min(total_pages);
        let offset = i64::from(page - 1) * page_size;

        let posts = self.store.list_posts(filter, page_size, offset).await?;

        Ok(FeedPage {
            posts,
            total_items,
            page,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_parsing_is_permissive() {
        assert_eq!(page_from_query(None), 1);
        assert_eq!(page_from_query(Some("")), 1);
        assert_eq!(page_from_query(Some("abc")), 1);
        assert_eq!(page_from_query(Some("0")), 1);
        assert_eq!(page_from_query(Some("-3")), 1);
        assert_eq!(page_from_query(Some("2")), 2);
        assert_eq!(page_from_query(Some(" 7 ")), 7);
    }
}
