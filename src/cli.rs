use crate::controller::QueryController;
use crate::engine::QueryEngine;
use crate::model::QueryConfig;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::Write;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

#[derive(Debug, Parser, Clone)]
#[command(
    name = "hn-agent",
    version,
    about = "Ask the HackerNews AI agent in natural language, with optional TUI"
)]
pub struct Cli {
    /// Natural-language query (initial input in TUI mode, required with --text/--json)
    pub query: Option<String>,

    /// Base URL of the agent query service
    #[arg(long, env = "HN_AGENT_BACKEND_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Print the result as JSON and exit (no TUI)
    #[arg(long, conflicts_with = "text")]
    pub json: bool,

    /// Print a text rendering of the result and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Check the service health endpoint and exit
    #[arg(long, conflicts_with_all = ["json", "text"])]
    pub health: bool,

    /// Request timeout (e.g. 30s); requests wait indefinitely when unset
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,

    /// Submit QUERY as soon as the TUI starts
    #[arg(long)]
    pub submit_on_launch: bool,

    /// Append logs to this file (the TUI logs nowhere else)
    #[arg(long)]
    pub log_file: Option<std::path::PathBuf>,
}

impl Cli {
    pub fn is_tui(&self) -> bool {
        cfg!(feature = "tui") && !self.json && !self.text && !self.health
    }
}

pub async fn run(args: Cli) -> Result<()> {
    match (args.log_file.as_deref(), args.is_tui()) {
        (Some(path), _) => crate::logging::init_file(path)?,
        (None, false) => crate::logging::init_stderr(),
        (None, true) => {}
    }

    if args.health {
        return run_health(args).await;
    }

    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(args).await;
        }
    }

    if args.json {
        return run_json(args).await;
    }

    run_text(args).await
}

/// Build a `QueryConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> QueryConfig {
    QueryConfig {
        base_url: args.base_url.trim().trim_end_matches('/').to_string(),
        timeout: args.timeout.map(Duration::from),
        user_agent: format!("hn-agent/{}", env!("CARGO_PKG_VERSION")),
    }
}

/// Run a single submission through the controller and return it resolved.
async fn submit_once(args: &Cli) -> Result<QueryController> {
    let cfg = build_config(args);
    let engine = QueryEngine::new(&cfg)?;
    let mut controller = QueryController::with_query(args.query.clone().unwrap_or_default());
    let query = controller
        .submit()
        .ok_or_else(|| anyhow!("a non-empty QUERY is required with --text or --json"))?;

    match engine.run(&query).await {
        Ok(result) => controller.succeed(result),
        Err(e) => controller.fail(e.user_message()),
    }
    Ok(controller)
}

async fn run_json(args: Cli) -> Result<()> {
    let controller = submit_once(&args).await?;
    let state = controller.state();
    if let Some(msg) = state.error_message() {
        return Err(anyhow!("{msg}"));
    }
    let result = state
        .result()
        .ok_or_else(|| anyhow!("query did not resolve"))?;
    let out = serde_json::to_string_pretty(result).context("serialize result")?;
    println!("{out}");
    Ok(())
}

async fn run_text(args: Cli) -> Result<()> {
    eprintln!("Querying {} …", build_config(&args).base_url);

    let controller = submit_once(&args).await?;
    let view = crate::view::render(controller.state());
    if let Some(msg) = view.error.as_deref() {
        return Err(anyhow!("{msg}"));
    }

    let summary = crate::text_summary::build_text_summary(&view);
    let mut out = std::io::stdout().lock();
    for line in &summary.lines {
        writeln!(out, "{line}").context("write to stdout")?;
    }
    out.flush().context("flush stdout")?;
    Ok(())
}

async fn run_health(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let engine = QueryEngine::new(&cfg)?;
    let status = engine
        .client()
        .health()
        .await
        .with_context(|| format!("health check against {} failed", engine.client().base_url()))?;
    match status.timestamp.as_deref() {
        Some(ts) => println!("{} ({ts})", status.status),
        None => println!("{}", status.status),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn base_url_defaults_to_local_service() {
        // Inspect the declared default instead of parsing, so a set
        // HN_AGENT_BACKEND_URL in the test environment cannot interfere.
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "base_url")
            .expect("base_url arg");
        assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new("HN_AGENT_BACKEND_URL")));
        let defaults: Vec<_> = arg.get_default_values().iter().map(|v| v.as_os_str()).collect();
        assert_eq!(defaults, [std::ffi::OsStr::new(DEFAULT_BASE_URL)]);
    }

    #[test]
    fn explicit_base_url_wins_and_timeout_is_off_by_default() {
        let args = Cli::parse_from(["hn-agent", "--base-url", DEFAULT_BASE_URL]);
        let cfg = build_config(&args);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout, None);
    }

    #[test]
    fn base_url_flag_trims_trailing_slash() {
        let args = Cli::parse_from(["hn-agent", "--base-url", "https://agent.example.com/", "--timeout", "30s"]);
        let cfg = build_config(&args);
        assert_eq!(cfg.base_url, "https://agent.example.com");
        assert_eq!(cfg.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn one_shot_modes_are_not_tui() {
        let args = Cli::parse_from(["hn-agent", "--text", "top 5 stories"]);
        assert!(!args.is_tui());
        assert_eq!(args.query.as_deref(), Some("top 5 stories"));
        assert!(Cli::try_parse_from(["hn-agent", "--json", "--text", "q"]).is_err());
    }

    #[tokio::test]
    async fn whitespace_query_is_rejected_before_any_request() {
        let args = Cli::parse_from(["hn-agent", "--json", "--base-url", "http://127.0.0.1:9", "   "]);
        let err = submit_once(&args).await.expect_err("must reject");
        assert!(err.to_string().contains("non-empty QUERY"));
    }
}
