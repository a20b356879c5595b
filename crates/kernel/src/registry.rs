use anyhow::{anyhow, Context};
use std::sync::Arc;

use crate::operation::{Operation, RunCtx};

/// Ordered catalogue of operations; registration order is the default run order
pub struct OperationRegistry {
    operations: Vec<Arc<dyn Operation>>,
}

impl OperationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Append an operation to the catalogue
    pub fn register(&mut self, operation: Arc<dyn Operation>) {
        self.operations.push(operation);
    }

    /// All registered operations in catalogue order
    pub fn operations(&self) -> &[Arc<dyn Operation>] {
        &self.operations
    }

    /// Look up an operation by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Operation>> {
        self.operations.iter().find(|op| op.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.operations.iter().map(|op| op.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Resolve a list of names into an execution plan.
    ///
    /// An empty list selects the whole catalogue. Names keep the order they
    /// were given in, and every name is checked before anything runs.
    pub fn plan(&self, names: &[String]) -> anyhow::Result<Vec<Arc<dyn Operation>>> {
        if names.is_empty() {
            return Ok(self.operations.clone());
        }

        let unknown: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .filter(|name| self.get(name).is_none())
            .collect();
        if !unknown.is_empty() {
            return Err(anyhow!(
                "unknown operation(s): {}; available: {}",
                unknown.join(", "),
                self.names().join(", ")
            ));
        }

        Ok(names
            .iter()
            .filter_map(|name| self.get(name).cloned())
            .collect())
    }

    /// Run a plan one operation at a time, stopping at the first failure.
    ///
    /// Returns the number of operations that completed.
    pub async fn run_plan(
        &self,
        plan: &[Arc<dyn Operation>],
        ctx: &RunCtx<'_>,
    ) -> anyhow::Result<usize> {
        tracing::info!(
            "running {} operation(s): {:?}",
            plan.len(),
            plan.iter().map(|op| op.name()).collect::<Vec<_>>()
        );

        for (completed, operation) in plan.iter().enumerate() {
            tracing::info!(operation = operation.name(), "running operation");

            operation.run(ctx).await.with_context(|| {
                format!(
                    "operation '{}' failed after {} completed",
                    operation.name(),
                    completed
                )
            })?;

            tracing::debug!(operation = operation.name(), "operation finished");
        }

        Ok(plan.len())
    }

    /// Resolve `names` and run the resulting plan
    pub async fn run_named(&self, names: &[String], ctx: &RunCtx<'_>) -> anyhow::Result<usize> {
        let plan = self.plan(names)?;
        self.run_plan(&plan, ctx).await
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Document;
    use mongodb::Client;
    use std::sync::Mutex;

    struct RecordingOp {
        name: &'static str,
        fail: bool,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait::async_trait]
    impl Operation for RecordingOp {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn run(&self, _ctx: &RunCtx<'_>) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                anyhow::bail!("boom");
            }
            Ok(())
        }
    }

    fn registry_with(
        ops: &[(&'static str, bool)],
    ) -> (OperationRegistry, Arc<Mutex<Vec<&'static str>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = OperationRegistry::new();
        for &(name, fail) in ops {
            registry.register(Arc::new(RecordingOp {
                name,
                fail,
                log: log.clone(),
            }));
        }
        (registry, log)
    }

    // Client construction parses the URI only; no server is contacted.
    async fn offline_client() -> Client {
        Client::with_uri_str("mongodb://127.0.0.1:27017").await.unwrap()
    }

    #[test]
    fn test_registry_creation() {
        let registry = OperationRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("find-all-books").is_none());
    }

    #[test]
    fn test_empty_selection_plans_whole_catalogue() {
        let (registry, _) = registry_with(&[("a", false), ("b", false), ("c", false)]);
        let plan = registry.plan(&[]).unwrap();
        let names: Vec<_> = plan.iter().map(|op| op.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_plan_keeps_requested_order() {
        let (registry, _) = registry_with(&[("a", false), ("b", false), ("c", false)]);
        let plan = registry
            .plan(&["c".to_string(), "a".to_string()])
            .unwrap();
        let names: Vec<_> = plan.iter().map(|op| op.name()).collect();
        assert_eq!(names, vec!["c", "a"]);
    }

    #[test]
    fn test_unknown_names_are_rejected_up_front() {
        let (registry, _) = registry_with(&[("a", false)]);
        let err = match registry.plan(&["a".to_string(), "nope".to_string()]) {
            Ok(_) => panic!("expected unknown operation error"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("unknown operation(s): nope"));
    }

    #[tokio::test]
    async fn test_run_plan_is_sequential_and_stops_on_failure() {
        let (registry, log) =
            registry_with(&[("first", false), ("second", true), ("third", false)]);
        let client = offline_client().await;
        let database = client.database("shelf_registry_test");
        let books = database.collection::<Document>("books");
        let ctx = RunCtx {
            database: &database,
            books: &books,
        };

        let err = registry.run_named(&[], &ctx).await.unwrap_err();
        assert!(format!("{err:#}").contains("operation 'second' failed after 1 completed"));
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_run_plan_reports_completed_count() {
        let (registry, log) = registry_with(&[("a", false), ("b", false)]);
        let client = offline_client().await;
        let database = client.database("shelf_registry_test");
        let books = database.collection::<Document>("books");
        let ctx = RunCtx {
            database: &database,
            books: &books,
        };

        let completed = registry
            .run_named(&["b".to_string()], &ctx)
            .await
            .unwrap();
        assert_eq!(completed, 1);
        assert_eq!(*log.lock().unwrap(), vec!["b"]);
    }
}
