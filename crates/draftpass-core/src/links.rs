//! Shareable preview links.
//!
//! A link is the home URL plus the parameters that address the item the way
//! the host would (`page_id` for pages, `p` for posts, `p` and `post_type`
//! for anything else), `preview=true`, and the token parameter.

use std::sync::Arc;

use url::Url;

use crate::content::{ContentItem, ContentKind};
use crate::error::Result;
use crate::request::TOKEN_PARAM;
use crate::token::{TokenCodec, subject_action};

#[derive(Debug, Clone)]
pub struct PreviewLinks {
    home: Url,
    codec: Arc<TokenCodec>,
}

impl PreviewLinks {
    /// `base_url` is the site's home URL; a trailing slash is implied.
    pub fn new(base_url: &str, codec: Arc<TokenCodec>) -> Result<Self> {
        let mut home = Url::parse(base_url)?;
        if !home.path().ends_with('/') {
            let path = format!("{}/", home.path());
            home.set_path(&path);
        }
        home.set_query(None);
        Ok(Self { home, codec })
    }

    /// The shareable preview link for `item`, valid from now.
    pub fn preview_link(&self, item: &ContentItem) -> String {
        self.build(item, None)
    }

    /// The preview link for page `page` of a multi-page document.
    pub fn page_link(&self, item: &ContentItem, page: u32) -> String {
        self.build(item, Some(page))
    }

    /// Canonical address of the published item.
    pub fn permalink(&self, item: &ContentItem) -> String {
        let mut url = self.home.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&item.slug_or_id());
        }
        url.to_string()
    }

    fn build(&self, item: &ContentItem, page: Option<u32>) -> String {
        let id = item.id.to_string();
        let token = self.codec.create(&subject_action(item.id));

        let mut url = self.home.clone();
        {
            let mut query = url.query_pairs_mut();
            match &item.kind {
                ContentKind::Page => {
                    query.append_pair("page_id", &id);
                }
                ContentKind::Post => {
                    query.append_pair("p", &id);
                }
                other => {
                    query.append_pair("p", &id);
                    query.append_pair("post_type", other.as_str());
                }
            }
            query.append_pair("preview", "true");
            query.append_pair(TOKEN_PARAM, &token);
            if let Some(page) = page {
                query.append_pair("page", &page.to_string());
            }
        }
        url.to_string()
    }
}
