use async_trait::async_trait;
use mongodb::{bson::Document, Collection, Database};

/// Context handed to every operation for the lifetime of one run
pub struct RunCtx<'a> {
    pub database: &'a Database,
    pub books: &'a Collection<Document>,
}

/// A named query, aggregation, or index request executed by the runner
#[async_trait]
pub trait Operation: Sync + Send {
    /// Unique kebab-case name, used in settings and on the command line
    fn name(&self) -> &'static str;

    /// One-line description shown by `shelf list`
    fn summary(&self) -> &'static str {
        ""
    }

    /// Issue the database call and print its outcome
    async fn run(&self, ctx: &RunCtx<'_>) -> anyhow::Result<()>;
}
