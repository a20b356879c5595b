use serde::{Deserialize, Serialize};

/// A book as stored in the collection.
///
/// Only the seeder builds these; queries work on raw documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub price: f64,
    pub in_stock: bool,
}

impl Book {
    pub fn new(
        title: &str,
        author: &str,
        genre: &str,
        published_year: i32,
        price: f64,
        in_stock: bool,
    ) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            published_year,
            price,
            in_stock,
        }
    }
}

/// Sample catalogue inserted by `shelf seed`.
pub fn sample_books() -> Vec<Book> {
    vec![
        Book::new("To Kill a Mockingbird", "Harper Lee", "Fiction", 1960, 12.99, true),
        Book::new("1984", "George Orwell", "Dystopian", 1949, 10.99, true),
        Book::new("The Great Gatsby", "F. Scott Fitzgerald", "Fiction", 1925, 9.99, true),
        Book::new("Brave New World", "Aldous Huxley", "Dystopian", 1932, 11.50, false),
        Book::new("The Hobbit", "J.R.R. Tolkien", "Fantasy", 1937, 14.99, true),
        Book::new("The Catcher in the Rye", "J.D. Salinger", "Fiction", 1951, 8.99, true),
        Book::new("Pride and Prejudice", "Jane Austen", "Romance", 1813, 7.99, true),
        Book::new("The Lord of the Rings", "J.R.R. Tolkien", "Fantasy", 1954, 19.99, true),
        Book::new("Animal Farm", "George Orwell", "Political Satire", 1945, 8.50, false),
        Book::new("The Alchemist", "Paulo Coelho", "Fiction", 1988, 10.99, true),
        Book::new("Moby Dick", "Herman Melville", "Adventure", 1851, 12.50, false),
        Book::new("The Midnight Library", "Matt Haig", "Fiction", 2020, 15.99, true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    #[test]
    fn serializes_with_collection_field_names() {
        let book = Book::new("Book A", "Someone", "Fiction", 1955, 10.0, true);
        let document = bson::to_document(&book).unwrap();
        assert_eq!(document.get_str("title").unwrap(), "Book A");
        assert_eq!(document.get_i32("published_year").unwrap(), 1955);
        assert_eq!(document.get_f64("price").unwrap(), 10.0);
        assert!(document.get_bool("in_stock").unwrap());
    }

    #[test]
    fn sample_titles_are_unique() {
        let books = sample_books();
        let mut titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), books.len());
    }

    #[test]
    fn samples_cover_the_default_query_arguments() {
        let books = sample_books();
        assert!(books.iter().any(|b| b.title == "1984"));
        assert!(books.iter().any(|b| b.title == "Moby Dick"));
        assert!(books.iter().any(|b| b.author == "George Orwell"));
        assert!(books.iter().any(|b| b.in_stock && b.published_year > 2010));
    }
}
