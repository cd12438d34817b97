//! Metric categories and the per-installation set of enabled ones.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One kind of statistics exposed by the node API.
///
/// Variants are declared in collection order; [`Category::ALL`] and every
/// [`CategorySet`] iterate in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Events,
    Jvm,
    Process,
    Mem,
    Pipeline,
    HotThreads,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Events,
        Category::Jvm,
        Category::Process,
        Category::Mem,
        Category::Pipeline,
        Category::HotThreads,
    ];

    /// Tag used for the event `type` and the payload key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Jvm => "jvm",
            Self::Process => "process",
            Self::Mem => "mem",
            Self::Pipeline => "pipeline",
            Self::HotThreads => "hot_threads",
        }
    }

    /// Path relative to the target base address, without query string.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Events => "/_node/stats/events",
            Self::Jvm => "/_node/stats/jvm",
            Self::Process => "/_node/stats/process",
            Self::Mem => "/_node/stats/mem",
            Self::Pipeline => "/_node/stats/pipeline",
            Self::HotThreads => "/_node/hot_threads",
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable set of enabled categories.
///
/// Built once from configuration. Emptiness is checked by the config
/// resolver, which refuses to start without any category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategorySet {
    bits: u8,
}

impl CategorySet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Category::ALL.into_iter().collect()
    }

    pub fn with(mut self, category: Category) -> Self {
        self.bits |= category.bit();
        self
    }

    pub fn contains(&self, category: Category) -> bool {
        self.bits & category.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Enabled categories in collection order.
    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}
