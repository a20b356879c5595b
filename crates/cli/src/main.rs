mod commands;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use shelf_db::Store;
use shelf_kernel::{settings::Settings, Operation, OperationRegistry, RunCtx};

use commands::{Cli, Command};

/// What a connected session does once the store is open.
enum Work {
    Operations(Vec<Arc<dyn Operation>>),
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    if let Some(uri) = cli.uri.clone() {
        settings.database.uri = uri;
    }

    shelf_telemetry::init(&settings.telemetry)?;

    let registry = shelf_app::registry(&settings.run.params);

    let work = match &cli.command {
        Command::List => {
            for operation in registry.operations() {
                println!("{:<28} {}", operation.name(), operation.summary());
            }
            return Ok(ExitCode::SUCCESS);
        }
        Command::Seed => Work::Seed,
        Command::Run { only } => {
            let names = if only.is_empty() {
                &settings.run.operations
            } else {
                only
            };
            Work::Operations(registry.plan(names)?)
        }
        single => Work::Operations(
            single
                .operation(&settings.run.params)
                .into_iter()
                .collect(),
        ),
    };

    tracing::info!(
        env = ?settings.environment,
        database = %settings.database.database,
        collection = %settings.database.collection,
        "shelf starting"
    );

    Ok(session(&settings, &registry, work).await)
}

/// Open the store, do the work, and always close and report, whatever failed.
async fn session(settings: &Settings, registry: &OperationRegistry, work: Work) -> ExitCode {
    let store = match Store::connect(&settings.database).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, uri = %settings.database.uri, "could not connect");
            println!("\nConnection closed");
            return ExitCode::FAILURE;
        }
    };
    println!("Connected to MongoDB");

    let outcome = match work {
        Work::Operations(plan) => {
            let ctx = RunCtx {
                database: store.database(),
                books: store.books(),
            };
            registry.run_plan(&plan, &ctx).await.map(|_| ())
        }
        Work::Seed => shelf_app::books::seed::seed_sample_books(&store.typed_books())
            .await
            .map(|inserted| println!("\nInserted {inserted} sample books"))
            .with_context(|| "failed to seed sample books"),
    };

    let code = match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = format!("{err:#}");
            tracing::error!(error = %message, "run aborted");
            ExitCode::FAILURE
        }
    };

    store.close().await;
    println!("\nConnection closed");
    code
}
