//! Filter, projection, sort and paging documents for the find-style queries.

use mongodb::bson::{doc, Document};

/// Year after which `in_stock_recent` considers a book recent.
pub const RECENT_YEAR: i32 = 2010;

pub fn all() -> Document {
    doc! {}
}

pub fn published_after(year: i32) -> Document {
    doc! { "published_year": { "$gt": year } }
}

pub fn by_author(author: &str) -> Document {
    doc! { "author": author }
}

pub fn by_title(title: &str) -> Document {
    doc! { "title": title }
}

/// In stock and published after [`RECENT_YEAR`].
pub fn in_stock_recent() -> Document {
    doc! { "in_stock": true, "published_year": { "$gt": RECENT_YEAR } }
}

pub fn set_price(price: f64) -> Document {
    doc! { "$set": { "price": price } }
}

/// Keep only title, author and price.
pub fn title_author_price() -> Document {
    doc! { "_id": 0, "title": 1, "author": 1, "price": 1 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// `"asc"` sorts ascending; every other flag falls back to descending.
    pub fn from_flag(flag: &str) -> Self {
        if flag == "asc" {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

pub fn by_price(order: SortOrder) -> Document {
    doc! { "price": order.direction() }
}

/// A 1-indexed page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    pub fn new(number: u64, size: u64) -> Self {
        Self { number, size }
    }

    /// Documents to skip: `(number - 1) * size`.
    pub fn skip(&self) -> u64 {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }

    /// A zero-sized page holds no documents.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.size).unwrap_or(i64::MAX)
    }
}

/// Natural insertion order, so consecutive pages never overlap.
pub fn stable_paging_order() -> Document {
    doc! { "_id": 1 }
}
