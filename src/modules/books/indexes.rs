//! Index requests and the explain-based before/after comparison.

use mongodb::{
    bson::{doc, Bson, Document},
    Collection, Database, IndexModel,
};

use super::filters;

/// Title looked up when comparing plans with and without the title index.
pub const LOOKUP_TITLE: &str = "1984";

pub fn title_index() -> IndexModel {
    IndexModel::builder().keys(doc! { "title": 1 }).build()
}

pub fn author_year_index() -> IndexModel {
    IndexModel::builder()
        .keys(doc! { "author": 1, "published_year": -1 })
        .build()
}

/// Returns the name the server gave the index.
pub async fn create_title_index(books: &Collection<Document>) -> mongodb::error::Result<String> {
    Ok(books.create_index(title_index()).await?.index_name)
}

pub async fn create_compound_index(
    books: &Collection<Document>,
) -> mongodb::error::Result<String> {
    Ok(books.create_index(author_year_index()).await?.index_name)
}

/// Metrics pulled out of an `executionStats` explain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainSummary {
    pub docs_examined: i64,
    pub execution_time_ms: i64,
    /// Winning plan stages from the root down, e.g. `["FETCH", "IXSCAN"]`.
    pub stages: Vec<String>,
}

impl ExplainSummary {
    pub fn from_explain(explain: &Document) -> Self {
        let stats = explain.get_document("executionStats").ok();
        let number = |key: &str| stats.and_then(|s| s.get(key)).and_then(as_i64).unwrap_or(0);

        let winning = explain
            .get_document("queryPlanner")
            .and_then(|planner| planner.get_document("winningPlan"))
            .ok()
            .map(|plan| plan.get_document("queryPlan").unwrap_or(plan));

        Self {
            docs_examined: number("totalDocsExamined"),
            execution_time_ms: number("executionTimeMillis"),
            stages: winning.map(stage_chain).unwrap_or_default(),
        }
    }

    pub fn winning_stage(&self) -> &str {
        self.stages.first().map(String::as_str).unwrap_or("UNKNOWN")
    }

    /// The access stage at the bottom of the plan (`COLLSCAN`, `IXSCAN`, ...).
    pub fn access_stage(&self) -> &str {
        self.stages.last().map(String::as_str).unwrap_or("UNKNOWN")
    }
}

fn stage_chain(plan: &Document) -> Vec<String> {
    let mut stages = Vec::new();
    let mut current = Some(plan);
    while let Some(stage) = current {
        if let Ok(name) = stage.get_str("stage") {
            stages.push(name.to_string());
        }
        current = stage.get_document("inputStage").ok();
    }
    stages
}

fn as_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) => Some(*v as i64),
        _ => None,
    }
}

/// Explain the exact-title lookup with execution statistics.
pub async fn explain_title_lookup(
    database: &Database,
    books: &Collection<Document>,
    title: &str,
) -> mongodb::error::Result<ExplainSummary> {
    let explain = database
        .run_command(doc! {
            "explain": { "find": books.name(), "filter": filters::by_title(title) },
            "verbosity": "executionStats",
        })
        .await?;
    Ok(ExplainSummary::from_explain(&explain))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexComparison {
    pub before: ExplainSummary,
    pub after: ExplainSummary,
    pub index_name: String,
}

/// Drop every secondary index, explain the title lookup, rebuild the title
/// index and explain again.
pub async fn analyze_index_performance(
    database: &Database,
    books: &Collection<Document>,
) -> mongodb::error::Result<IndexComparison> {
    books.drop_indexes().await?;
    let before = explain_title_lookup(database, books, LOOKUP_TITLE).await?;
    tracing::debug!(stage = before.access_stage(), "explained lookup without index");

    let index_name = create_title_index(books).await?;
    let after = explain_title_lookup(database, books, LOOKUP_TITLE).await?;
    tracing::debug!(stage = after.access_stage(), "explained lookup with index");

    Ok(IndexComparison {
        before,
        after,
        index_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_keys_match_requested_directions() {
        assert_eq!(title_index().keys, doc! { "title": 1 });
        assert_eq!(
            author_year_index().keys,
            doc! { "author": 1, "published_year": -1 }
        );
    }

    #[test]
    fn summary_reads_classic_plan_shape() {
        let explain = doc! {
            "queryPlanner": {
                "winningPlan": {
                    "stage": "FETCH",
                    "inputStage": { "stage": "IXSCAN", "indexName": "title_1" }
                }
            },
            "executionStats": {
                "totalDocsExamined": 1,
                "executionTimeMillis": 0i64,
            }
        };

        let summary = ExplainSummary::from_explain(&explain);
        assert_eq!(summary.docs_examined, 1);
        assert_eq!(summary.execution_time_ms, 0);
        assert_eq!(summary.stages, vec!["FETCH", "IXSCAN"]);
        assert_eq!(summary.winning_stage(), "FETCH");
        assert_eq!(summary.access_stage(), "IXSCAN");
    }

    #[test]
    fn summary_reads_sbe_plan_shape() {
        let explain = doc! {
            "queryPlanner": {
                "winningPlan": {
                    "queryPlan": { "stage": "COLLSCAN" },
                    "slotBasedPlan": { "slots": "..." }
                }
            },
            "executionStats": {
                "totalDocsExamined": 12,
                "executionTimeMillis": 3,
            }
        };

        let summary = ExplainSummary::from_explain(&explain);
        assert_eq!(summary.docs_examined, 12);
        assert_eq!(summary.execution_time_ms, 3);
        assert_eq!(summary.winning_stage(), "COLLSCAN");
    }

    #[test]
    fn missing_sections_fall_back_to_zero_and_unknown() {
        let summary = ExplainSummary::from_explain(&doc! {});
        assert_eq!(summary.docs_examined, 0);
        assert!(summary.stages.is_empty());
        assert_eq!(summary.winning_stage(), "UNKNOWN");
    }
}
