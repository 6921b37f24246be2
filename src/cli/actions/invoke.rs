use crate::{
    cli::{globals::GlobalArgs, telemetry},
    functions::{Event, Function, Functions, OperationResult},
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Where the invocation event comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSource {
    Path(PathBuf),
    Inline(String),
}

impl EventSource {
    /// # Errors
    /// Returns an error if the file cannot be read or does not contain a JSON event.
    pub async fn load(&self) -> Result<Event> {
        let raw = match self {
            Self::Path(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read event file: {}", path.display()))?,
            Self::Inline(data) => data.clone(),
        };

        serde_json::from_str(&raw).context("Invalid event JSON")
    }
}

#[derive(Debug)]
pub struct Args {
    pub function: Function,
    pub event: EventSource,
    pub globals: GlobalArgs,
}

/// Invoke the function once and return its envelope.
/// # Errors
/// Returns an error if the configuration is invalid or the event cannot be loaded; function
/// failures are reported inside the envelope.
pub async fn run(args: &Args) -> Result<OperationResult> {
    let functions = Functions::from_globals(&args.globals)?;
    let event = args.event.load().await?;

    debug!("invoking {} with {:?}", args.function, args.event);

    let result = functions.invoke(args.function, event).await;

    info!("{} success: {}", args.function, result.is_success());

    Ok(result)
}

/// Execute the invoke action, printing the envelope to stdout.
/// # Errors
/// Returns an error if the invocation cannot run or the result cannot be serialized.
pub async fn execute(args: Args) -> Result<()> {
    let result = run(&args).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    telemetry::shutdown_tracer();

    Ok(())
}
