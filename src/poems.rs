use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progress::CompletedPoems;

const BUNDLED_POEMS: &str = include_str!("../assets/poems.json");

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Poem {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub dynasty: String,
    #[serde(alias = "lines")]
    pub content: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Poem {
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|src| !src.trim().is_empty())
    }

    pub fn has_image(&self) -> bool {
        self.image().is_some()
    }

    fn matches(&self, query: &str) -> bool {
        self.title.contains(query)
            || self.author.contains(query)
            || self.content.iter().any(|line| line.contains(query))
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("poem dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("poem dataset is empty")]
    Empty,

    #[error("poem at position {position} has id {found}, expected {expected}")]
    NonDenseId {
        position: usize,
        expected: u32,
        found: u32,
    },
}

#[derive(Clone, PartialEq, Debug)]
pub struct PoemCatalog {
    poems: Vec<Poem>,
}

impl PoemCatalog {
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_POEMS)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let poems: Vec<Poem> = serde_json::from_str(raw)?;
        Self::new(poems)
    }

    /// Ids must be 1-based and match array position.
    pub fn new(poems: Vec<Poem>) -> Result<Self, CatalogError> {
        if poems.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (position, poem) in poems.iter().enumerate() {
            let expected = position as u32 + 1;
            if poem.id != expected {
                return Err(CatalogError::NonDenseId {
                    position,
                    expected,
                    found: poem.id,
                });
            }
        }
        Ok(Self { poems })
    }

    pub fn len(&self) -> usize {
        self.poems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poems.is_empty()
    }

    pub fn last_id(&self) -> u32 {
        self.poems.len() as u32
    }

    pub fn get(&self, id: u32) -> Option<&Poem> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.poems.get(index)
    }

    pub fn first(&self) -> &Poem {
        &self.poems[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Poem> {
        self.poems.iter()
    }

    /// Resolve the `poemId` query value. Anything that is not a plain
    /// positive integer within the dataset resolves to the first poem.
    pub fn resolve_id(&self, raw: Option<&str>) -> u32 {
        raw.filter(|raw| !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|id| *id >= 1 && *id <= u64::from(self.last_id()))
            .map(|id| id as u32)
            .unwrap_or(1)
    }

    /// Substring search over title, author and verse lines, capped at
    /// `cap` results. An empty query lists everything.
    pub fn search(&self, query: &str, cap: usize) -> Vec<&Poem> {
        self.poems
            .iter()
            .filter(|poem| poem.matches(query))
            .take(cap)
            .collect()
    }

    /// Where "start learning" goes: the first poem not yet completed, or the
    /// first poem once everything is done.
    pub fn first_uncompleted(&self, completed: &CompletedPoems) -> u32 {
        self.poems
            .iter()
            .find(|poem| !completed.contains(poem.id))
            .map(|poem| poem.id)
            .unwrap_or(1)
    }

    /// Every picture that can show up in `poem_id`'s line-up.
    pub fn line_up_images(&self, poem_id: u32) -> Vec<&str> {
        self.get(poem_id)
            .and_then(Poem::image)
            .into_iter()
            .chain(self.distractor_pool(poem_id).into_iter().filter_map(Poem::image))
            .collect()
    }

    pub fn distractor_pool(&self, exclude_id: u32) -> Vec<&Poem> {
        self.poems
            .iter()
            .filter(|poem| poem.id != exclude_id && poem.has_image())
            .collect()
    }
}
