pub mod filters;
pub mod indexes;
pub mod models;
pub mod pipelines;
pub mod queries;
pub mod report;
pub mod seed;

use std::sync::Arc;

use async_trait::async_trait;
use shelf_kernel::{settings::RunParams, Operation, RunCtx};

use filters::{Page, SortOrder};

pub struct FindAllBooks;

#[async_trait]
impl Operation for FindAllBooks {
    fn name(&self) -> &'static str {
        "find-all-books"
    }

    fn summary(&self) -> &'static str {
        "every book, unfiltered"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let books = queries::find_all_books(ctx.books).await?;
        report::print_documents("All books", &books);
        Ok(())
    }
}

pub struct FindAfterYear {
    pub year: i32,
}

#[async_trait]
impl Operation for FindAfterYear {
    fn name(&self) -> &'static str {
        "find-after-year"
    }

    fn summary(&self) -> &'static str {
        "books published after a given year"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let books = queries::find_after_year(ctx.books, self.year).await?;
        report::print_documents(&format!("Books published after {}", self.year), &books);
        Ok(())
    }
}

pub struct FindByAuthor {
    pub author: String,
}

#[async_trait]
impl Operation for FindByAuthor {
    fn name(&self) -> &'static str {
        "find-by-author"
    }

    fn summary(&self) -> &'static str {
        "books by an exact author name"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let books = queries::find_by_author(ctx.books, &self.author).await?;
        report::print_documents(&format!("Books by {}", self.author), &books);
        Ok(())
    }
}

pub struct UpdateBookPrice {
    pub title: String,
    pub price: f64,
}

#[async_trait]
impl Operation for UpdateBookPrice {
    fn name(&self) -> &'static str {
        "update-book-price"
    }

    fn summary(&self) -> &'static str {
        "set the price of the first book with a title"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let outcome = queries::update_book_price(ctx.books, &self.title, self.price).await?;
        println!("\n{}", report::update_message(outcome, &self.title, self.price));
        Ok(())
    }
}

pub struct DeleteBookByTitle {
    pub title: String,
}

#[async_trait]
impl Operation for DeleteBookByTitle {
    fn name(&self) -> &'static str {
        "delete-book-by-title"
    }

    fn summary(&self) -> &'static str {
        "delete the first book with a title"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let outcome = queries::delete_book_by_title(ctx.books, &self.title).await?;
        println!("\n{}", report::delete_message(outcome, &self.title));
        Ok(())
    }
}

pub struct FindInStockAfter2010;

#[async_trait]
impl Operation for FindInStockAfter2010 {
    fn name(&self) -> &'static str {
        "find-in-stock-after-2010"
    }

    fn summary(&self) -> &'static str {
        "in-stock books published after 2010"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let books = queries::find_in_stock_after_2010(ctx.books).await?;
        report::print_documents("In-stock books published after 2010", &books);
        Ok(())
    }
}

pub struct ProjectTitleAuthorPrice;

#[async_trait]
impl Operation for ProjectTitleAuthorPrice {
    fn name(&self) -> &'static str {
        "project-title-author-price"
    }

    fn summary(&self) -> &'static str {
        "every book reduced to title, author and price"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let books = queries::project_title_author_price(ctx.books).await?;
        report::print_documents("Title, author and price", &books);
        Ok(())
    }
}

pub struct SortByPrice {
    pub order: SortOrder,
}

#[async_trait]
impl Operation for SortByPrice {
    fn name(&self) -> &'static str {
        "sort-by-price"
    }

    fn summary(&self) -> &'static str {
        "every book ordered by price (\"asc\", otherwise descending)"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let books = queries::sort_by_price(ctx.books, self.order).await?;
        report::print_documents(
            &format!("Books sorted by price ({})", self.order.label()),
            &books,
        );
        Ok(())
    }
}

pub struct PaginateBooks {
    pub page: Page,
}

#[async_trait]
impl Operation for PaginateBooks {
    fn name(&self) -> &'static str {
        "paginate-books"
    }

    fn summary(&self) -> &'static str {
        "one 1-indexed page of books"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let books = queries::paginate_books(ctx.books, self.page).await?;
        report::print_documents(
            &format!("Page {} (page size {})", self.page.number, self.page.size),
            &books,
        );
        Ok(())
    }
}

pub struct AveragePriceByGenre;

#[async_trait]
impl Operation for AveragePriceByGenre {
    fn name(&self) -> &'static str {
        "average-price-by-genre"
    }

    fn summary(&self) -> &'static str {
        "mean price per genre, highest first"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let rows = queries::average_price_by_genre(ctx.books).await?;
        report::print_table("Average price by genre", &rows);
        Ok(())
    }
}

pub struct AuthorWithMostBooks;

#[async_trait]
impl Operation for AuthorWithMostBooks {
    fn name(&self) -> &'static str {
        "author-with-most-books"
    }

    fn summary(&self) -> &'static str {
        "the author with the most books"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let rows = queries::author_with_most_books(ctx.books).await?;
        report::print_table("Author with the most books", &rows);
        Ok(())
    }
}

pub struct BooksByDecade;

#[async_trait]
impl Operation for BooksByDecade {
    fn name(&self) -> &'static str {
        "books-by-decade"
    }

    fn summary(&self) -> &'static str {
        "book counts per publication decade"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let rows = queries::books_by_decade(ctx.books).await?;
        report::print_table("Books by decade", &rows);
        Ok(())
    }
}

pub struct CreateTitleIndex;

#[async_trait]
impl Operation for CreateTitleIndex {
    fn name(&self) -> &'static str {
        "create-title-index"
    }

    fn summary(&self) -> &'static str {
        "ascending index on title"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let name = indexes::create_title_index(ctx.books).await?;
        println!("\nCreated index: {name}");
        Ok(())
    }
}

pub struct CreateCompoundIndex;

#[async_trait]
impl Operation for CreateCompoundIndex {
    fn name(&self) -> &'static str {
        "create-compound-index"
    }

    fn summary(&self) -> &'static str {
        "compound index on author (asc) and published_year (desc)"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let name = indexes::create_compound_index(ctx.books).await?;
        println!("\nCreated compound index: {name}");
        Ok(())
    }
}

pub struct AnalyzeIndexPerformance;

#[async_trait]
impl Operation for AnalyzeIndexPerformance {
    fn name(&self) -> &'static str {
        "analyze-index-performance"
    }

    fn summary(&self) -> &'static str {
        "explain a title lookup without and with the title index"
    }

    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()> {
        let comparison = indexes::analyze_index_performance(ctx.database, ctx.books).await?;
        println!("\n{}", report::render_comparison(&comparison));
        Ok(())
    }
}

/// The full catalogue in its default run order, parameterised from settings.
pub fn create_operations(params: &RunParams) -> Vec<Arc<dyn Operation>> {
    vec![
        Arc::new(FindAllBooks),
        Arc::new(FindAfterYear { year: params.year }),
        Arc::new(FindByAuthor {
            author: params.author.clone(),
        }),
        Arc::new(UpdateBookPrice {
            title: params.update_title.clone(),
            price: params.price,
        }),
        Arc::new(DeleteBookByTitle {
            title: params.delete_title.clone(),
        }),
        Arc::new(FindInStockAfter2010),
        Arc::new(ProjectTitleAuthorPrice),
        Arc::new(SortByPrice {
            order: SortOrder::from_flag(&params.sort_order),
        }),
        Arc::new(PaginateBooks {
            page: Page::new(params.page, params.page_size),
        }),
        Arc::new(AveragePriceByGenre),
        Arc::new(AuthorWithMostBooks),
        Arc::new(BooksByDecade),
        Arc::new(CreateTitleIndex),
        Arc::new(CreateCompoundIndex),
        Arc::new(AnalyzeIndexPerformance),
    ]
}
