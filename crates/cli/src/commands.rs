use std::sync::Arc;

use clap::{Parser, Subcommand};
use shelf_app::books::{
    self,
    filters::{Page, SortOrder},
};
use shelf_kernel::{settings::RunParams, Operation};

/// Query runner for the book collection
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
pub struct Cli {
    /// Connection string, overriding `database.uri` from settings
    #[arg(long, global = true)]
    pub uri: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the configured operations in order, or only the named ones
    Run {
        /// Operation names, comma separated or repeated
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,
    },
    /// List every operation with a short description
    List,
    /// Drop the collection and insert the sample books
    Seed,
    FindAllBooks,
    FindAfterYear {
        #[arg(long)]
        year: Option<i32>,
    },
    FindByAuthor {
        #[arg(long)]
        author: Option<String>,
    },
    UpdateBookPrice {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        price: Option<f64>,
    },
    DeleteBookByTitle {
        #[arg(long)]
        title: Option<String>,
    },
    #[command(name = "find-in-stock-after-2010")]
    FindInStockAfter2010,
    ProjectTitleAuthorPrice,
    SortByPrice {
        /// "asc" for ascending; anything else sorts descending
        #[arg(long)]
        order: Option<String>,
    },
    PaginateBooks {
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        page: Option<u64>,
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        page_size: Option<u64>,
    },
    AveragePriceByGenre,
    AuthorWithMostBooks,
    BooksByDecade,
    CreateTitleIndex,
    CreateCompoundIndex,
    AnalyzeIndexPerformance,
}

impl Command {
    /// The single operation a per-operation subcommand stands for.
    ///
    /// Omitted arguments fall back to `params`. `run`, `list` and `seed`
    /// return `None`.
    pub fn operation(&self, params: &RunParams) -> Option<Arc<dyn Operation>> {
        let operation: Arc<dyn Operation> = match self {
            Command::Run { .. } | Command::List | Command::Seed => return None,
            Command::FindAllBooks => Arc::new(books::FindAllBooks),
            Command::FindAfterYear { year } => Arc::new(books::FindAfterYear {
                year: year.unwrap_or(params.year),
            }),
            Command::FindByAuthor { author } => Arc::new(books::FindByAuthor {
                author: author.clone().unwrap_or_else(|| params.author.clone()),
            }),
            Command::UpdateBookPrice { title, price } => Arc::new(books::UpdateBookPrice {
                title: title.clone().unwrap_or_else(|| params.update_title.clone()),
                price: price.unwrap_or(params.price),
            }),
            Command::DeleteBookByTitle { title } => Arc::new(books::DeleteBookByTitle {
                title: title.clone().unwrap_or_else(|| params.delete_title.clone()),
            }),
            Command::FindInStockAfter2010 => Arc::new(books::FindInStockAfter2010),
            Command::ProjectTitleAuthorPrice => Arc::new(books::ProjectTitleAuthorPrice),
            Command::SortByPrice { order } => Arc::new(books::SortByPrice {
                order: SortOrder::from_flag(order.as_deref().unwrap_or(&params.sort_order)),
            }),
            Command::PaginateBooks { page, page_size } => Arc::new(books::PaginateBooks {
                page: Page::new(
                    page.unwrap_or(params.page),
                    page_size.unwrap_or(params.page_size),
                ),
            }),
            Command::AveragePriceByGenre => Arc::new(books::AveragePriceByGenre),
            Command::AuthorWithMostBooks => Arc::new(books::AuthorWithMostBooks),
            Command::BooksByDecade => Arc::new(books::BooksByDecade),
            Command::CreateTitleIndex => Arc::new(books::CreateTitleIndex),
            Command::CreateCompoundIndex => Arc::new(books::CreateCompoundIndex),
            Command::AnalyzeIndexPerformance => Arc::new(books::AnalyzeIndexPerformance),
        };
        Some(operation)
    }
}
