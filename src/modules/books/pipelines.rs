//! Aggregation pipelines. The grouping and arithmetic all run inside the
//! database; these functions only describe the stages.

use mongodb::bson::{doc, Document};

/// Mean price per genre, most expensive genre first.
///
/// Rows: `{ genre, averagePrice }`.
pub fn average_price_by_genre() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$genre", "averagePrice": { "$avg": "$price" } } },
        doc! { "$sort": { "averagePrice": -1, "_id": 1 } },
        doc! { "$project": { "_id": 0, "genre": "$_id", "averagePrice": 1 } },
    ]
}

/// The single author with the most books.
///
/// Ties on the count are broken by author name, ascending, so the result is
/// the same on every run. Rows: `{ author, bookCount }`.
pub fn author_with_most_books() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$author", "bookCount": { "$sum": 1 } } },
        doc! { "$sort": { "bookCount": -1, "_id": 1 } },
        doc! { "$limit": 1 },
        doc! { "$project": { "_id": 0, "author": "$_id", "bookCount": 1 } },
    ]
}

/// Book counts per decade, oldest decade first.
///
/// The decade of a year is `year - year % 10`. Rows: `{ decade, count }`.
pub fn books_by_decade() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": {
                    "$subtract": [
                        "$published_year",
                        { "$mod": ["$published_year", 10] }
                    ]
                },
                "count": { "$sum": 1 }
            }
        },
        doc! { "$sort": { "_id": 1 } },
        doc! { "$project": { "_id": 0, "decade": "$_id", "count": 1 } },
    ]
}
