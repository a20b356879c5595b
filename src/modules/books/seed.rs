//! Sample data for trying the queries. Not part of any run list.

use mongodb::Collection;

use super::models::{sample_books, Book};

/// Replace the collection contents with `sample`. Returns the inserted count.
pub async fn replace_all(books: &Collection<Book>, sample: &[Book]) -> mongodb::error::Result<usize> {
    books.drop().await?;
    if sample.is_empty() {
        return Ok(0);
    }
    let result = books.insert_many(sample).await?;
    Ok(result.inserted_ids.len())
}

/// Drop the collection and insert the built-in sample catalogue.
pub async fn seed_sample_books(books: &Collection<Book>) -> mongodb::error::Result<usize> {
    let inserted = replace_all(books, &sample_books()).await?;
    tracing::info!(
        collection = books.name(),
        inserted,
        "seeded sample books"
    );
    Ok(inserted)
}
