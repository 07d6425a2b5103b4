//! CLI binary for websearch.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use websearch::cli::Args;
use websearch::report;
use websearch::router::{self, SearchError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout carries only the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("websearch=info,websearch_router=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(message) = args.check() {
        eprintln!("{}", report::to_json(&serde_json::json!({ "error": message }), args.compact)?);
        return Ok(ExitCode::FAILURE);
    }

    let mut config = websearch::config::load(args.config.as_deref());
    args.apply_to(&mut config);

    if args.explain_routing {
        let explanation = router::explain(args.query_text(), &config);
        println!("{}", report::to_json(&explanation, args.compact)?);
        return Ok(ExitCode::SUCCESS);
    }

    let request = args.request(&config);
    match router::search(&request, &config, args.provider.pinned()).await {
        Ok(outcome) => {
            println!("{}", report::to_json(&outcome, args.compact)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if !matches!(e, SearchError::Exhausted(_)) {
                tracing::error!(error = %e, "search rejected");
            }
            let value = report::error_value(args.query_text(), &e);
            eprintln!("{}", report::to_json(&value, false)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
