//! Find, update, delete and aggregate calls against the book collection.
//!
//! Each function is one driver round trip; results are collected into
//! memory for printing.

use futures::stream::TryStreamExt;
use mongodb::{
    bson::Document,
    error::Result,
    results::{DeleteResult, UpdateResult},
    Collection,
};

use super::filters::{self, Page, SortOrder};
use super::pipelines;

/// Outcome of a single-document write, derived from the server's counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    NoMatch,
}

impl WriteOutcome {
    pub fn from_count(count: u64) -> Self {
        if count > 0 {
            WriteOutcome::Applied
        } else {
            WriteOutcome::NoMatch
        }
    }

    pub fn from_update(result: &UpdateResult) -> Self {
        Self::from_count(result.modified_count)
    }

    pub fn from_delete(result: &DeleteResult) -> Self {
        Self::from_count(result.deleted_count)
    }
}

pub async fn find_all_books(books: &Collection<Document>) -> Result<Vec<Document>> {
    books.find(filters::all()).await?.try_collect().await
}

pub async fn find_after_year(books: &Collection<Document>, year: i32) -> Result<Vec<Document>> {
    books
        .find(filters::published_after(year))
        .await?
        .try_collect()
        .await
}

pub async fn find_by_author(books: &Collection<Document>, author: &str) -> Result<Vec<Document>> {
    books
        .find(filters::by_author(author))
        .await?
        .try_collect()
        .await
}

/// Set the price of the first book titled `title`. Never inserts.
pub async fn update_book_price(
    books: &Collection<Document>,
    title: &str,
    price: f64,
) -> Result<WriteOutcome> {
    let result = books
        .update_one(filters::by_title(title), filters::set_price(price))
        .await?;
    tracing::debug!(
        matched = result.matched_count,
        modified = result.modified_count,
        "update_one finished"
    );
    Ok(WriteOutcome::from_update(&result))
}

/// Delete the first book titled `title`.
pub async fn delete_book_by_title(
    books: &Collection<Document>,
    title: &str,
) -> Result<WriteOutcome> {
    let result = books.delete_one(filters::by_title(title)).await?;
    tracing::debug!(deleted = result.deleted_count, "delete_one finished");
    Ok(WriteOutcome::from_delete(&result))
}

pub async fn find_in_stock_after_2010(books: &Collection<Document>) -> Result<Vec<Document>> {
    books
        .find(filters::in_stock_recent())
        .await?
        .try_collect()
        .await
}

pub async fn project_title_author_price(books: &Collection<Document>) -> Result<Vec<Document>> {
    books
        .find(filters::all())
        .projection(filters::title_author_price())
        .await?
        .try_collect()
        .await
}

pub async fn sort_by_price(books: &Collection<Document>, order: SortOrder) -> Result<Vec<Document>> {
    books
        .find(filters::all())
        .sort(filters::by_price(order))
        .await?
        .try_collect()
        .await
}

/// At most `page.size` books; a size of 0 yields nothing, since the server
/// reads `limit(0)` as unlimited.
pub async fn paginate_books(books: &Collection<Document>, page: Page) -> Result<Vec<Document>> {
    if page.is_empty() {
        return Ok(Vec::new());
    }
    books
        .find(filters::all())
        .sort(filters::stable_paging_order())
        .skip(page.skip())
        .limit(page.limit())
        .await?
        .try_collect()
        .await
}

pub async fn average_price_by_genre(books: &Collection<Document>) -> Result<Vec<Document>> {
    aggregate(books, pipelines::average_price_by_genre()).await
}

pub async fn author_with_most_books(books: &Collection<Document>) -> Result<Vec<Document>> {
    aggregate(books, pipelines::author_with_most_books()).await
}

pub async fn books_by_decade(books: &Collection<Document>) -> Result<Vec<Document>> {
    aggregate(books, pipelines::books_by_decade()).await
}

async fn aggregate(books: &Collection<Document>, pipeline: Vec<Document>) -> Result<Vec<Document>> {
    books.aggregate(pipeline).await?.try_collect().await
}
