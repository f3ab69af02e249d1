//! Link records and the partial-update routine.
//!
//! [`update_link`] looks up a stored [`Link`] by id, merges a [`LinkUpdate`]
//! over it and writes it back. Failures come back as [`LinkError`], never as
//! an id-like sentinel.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collection::{Collection, Key};
use crate::criteria::{Criteria, Mode};
use crate::error::LinkError;
use crate::filter::filter_records;
use crate::record::{AsValue, Record};
use crate::value::Value;

/// Identifier of a stored link.
pub type LinkId = i64;

/// Category assigned to links saved without one.
pub const DEFAULT_LINK_CATEGORY: u64 = 1;

/// A stored link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Store-assigned identifier.
    pub link_id: LinkId,
    /// Target address.
    pub link_url: String,
    /// Display name.
    pub link_name: String,
    /// Browser target, such as `_blank`.
    #[serde(default)]
    pub link_target: String,
    /// Free-form description.
    #[serde(default)]
    pub link_description: String,
    /// Whether the link is shown publicly.
    #[serde(default = "visible_by_default")]
    pub link_visible: bool,
    /// Rating from 0 to 10.
    #[serde(default)]
    pub link_rating: u8,
    /// Private notes.
    #[serde(default)]
    pub link_notes: String,
    /// Category ids.
    #[serde(default)]
    pub link_categories: Vec<u64>,
}

fn visible_by_default() -> bool {
    true
}

impl Link {
    /// Creates a visible link with no categories.
    pub fn new(link_id: LinkId, link_url: impl Into<String>, link_name: impl Into<String>) -> Self {
        Link {
            link_id,
            link_url: link_url.into(),
            link_name: link_name.into(),
            link_target: String::new(),
            link_description: String::new(),
            link_visible: true,
            link_rating: 0,
            link_notes: String::new(),
            link_categories: Vec::new(),
        }
    }
}

impl Record for Link {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        match name {
            "link_id" => self.link_id.as_value(),
            "link_url" => self.link_url.as_value(),
            "link_name" => self.link_name.as_value(),
            "link_target" => self.link_target.as_value(),
            "link_description" => self.link_description.as_value(),
            "link_visible" => self.link_visible.as_value(),
            "link_rating" => self.link_rating.as_value(),
            "link_notes" => self.link_notes.as_value(),
            "link_categories" => self.link_categories.as_value(),
            _ => None,
        }
    }
}

/// Partial update for a link. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkUpdate {
    /// Link to update. Required by [`update_link`].
    pub link_id: Option<LinkId>,
    /// New target address.
    pub link_url: Option<String>,
    /// New display name.
    pub link_name: Option<String>,
    /// New browser target.
    pub link_target: Option<String>,
    /// New description.
    pub link_description: Option<String>,
    /// New visibility.
    pub link_visible: Option<bool>,
    /// New rating.
    pub link_rating: Option<u8>,
    /// New private notes.
    pub link_notes: Option<String>,
    /// New category ids. An empty list falls back to the default category.
    pub link_categories: Option<Vec<u64>>,
}

impl LinkUpdate {
    /// Starts an update for the given link.
    pub fn for_link(link_id: LinkId) -> Self {
        LinkUpdate {
            link_id: Some(link_id),
            ..LinkUpdate::default()
        }
    }

    /// Sets the new name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.link_name = Some(name.into());
        self
    }

    /// Sets the new URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.link_url = Some(url.into());
        self
    }

    /// Sets the new categories.
    pub fn categories(mut self, categories: Vec<u64>) -> Self {
        self.link_categories = Some(categories);
        self
    }

    /// Applies the set fields over `link`.
    pub fn merge_into(self, mut link: Link) -> Link {
        if let Some(v) = self.link_url {
            link.link_url = v;
        }
        if let Some(v) = self.link_name {
            link.link_name = v;
        }
        if let Some(v) = self.link_target {
            link.link_target = v;
        }
        if let Some(v) = self.link_description {
            link.link_description = v;
        }
        if let Some(v) = self.link_visible {
            link.link_visible = v;
        }
        if let Some(v) = self.link_rating {
            link.link_rating = v;
        }
        if let Some(v) = self.link_notes {
            link.link_notes = v;
        }
        if let Some(v) = self.link_categories {
            link.link_categories = v;
        }
        link
    }
}

/// Backing store for links.
pub trait LinkStore {
    /// Loads a link by id.
    fn get(&self, link_id: LinkId) -> Option<Link>;

    /// Saves a link, replacing any link with the same id.
    fn put(&mut self, link: Link);

    /// Category given to links saved with none.
    fn default_category(&self) -> u64 {
        DEFAULT_LINK_CATEGORY
    }
}

/// In-memory [`LinkStore`] keyed by link id, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryLinkStore {
    links: Collection<Link>,
    default_category: Option<u64>,
}

impl MemoryLinkStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryLinkStore::default()
    }

    /// Overrides the category given to links saved without one.
    pub fn with_default_category(mut self, category: u64) -> Self {
        self.default_category = Some(category);
        self
    }

    /// Returns every stored link.
    pub fn links(&self) -> &Collection<Link> {
        &self.links
    }

    /// Returns the stored links matching `criteria` under `mode`.
    pub fn find(&self, criteria: &Criteria, mode: Mode) -> Collection<&Link> {
        filter_records(&self.links, criteria, mode)
    }
}

impl LinkStore for MemoryLinkStore {
    fn get(&self, link_id: LinkId) -> Option<Link> {
        self.links.get(&Key::Int(link_id)).cloned()
    }

    fn put(&mut self, link: Link) {
        self.links.insert(link.link_id, link);
    }

    fn default_category(&self) -> u64 {
        self.default_category.unwrap_or(DEFAULT_LINK_CATEGORY)
    }
}

/// Merges `update` over the stored link it names and saves the result.
///
/// Returns the link id on success. A missing id or an unknown link is an
/// error; nothing is written in either case. A link left without categories
/// after the merge gets the store's default category.
///
/// ```
/// use sifter::links::{update_link, Link, LinkStore, LinkUpdate, MemoryLinkStore};
///
/// let mut store = MemoryLinkStore::new();
/// store.put(Link::new(7, "https://example.org", "Example"));
///
/// let id = update_link(&mut store, LinkUpdate::for_link(7).name("foo")).unwrap();
/// assert_eq!(id, 7);
/// assert_eq!(store.get(7).unwrap().link_name, "foo");
/// ```
pub fn update_link<S: LinkStore + ?Sized>(
    store: &mut S,
    update: LinkUpdate,
) -> Result<LinkId, LinkError> {
    let Some(link_id) = update.link_id else {
        debug!("link update without an id");
        return Err(LinkError::MissingId);
    };
    let Some(existing) = store.get(link_id) else {
        debug!(link_id, "link update for unknown link");
        return Err(LinkError::NotFound(link_id));
    };

    let mut link = update.merge_into(existing);
    link.link_id = link_id;
    if link.link_categories.is_empty() {
        link.link_categories = vec![store.default_category()];
    }
    store.put(link);
    Ok(link_id)
}
