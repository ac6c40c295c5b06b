//! Project Dashboard entry point
//!
//! Multi-source project status over MCP (stdio), HTTP or one-shot CLI commands.

use clap::{Parser, Subcommand};
use project_dashboard::handler::{create_router, AppState};
use project_dashboard::tools;
use project_dashboard::{DashboardConfig, ItemState, StatusEngine};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "project-dashboard")]
#[command(about = "Project Dashboard - multi-source project status aggregation")]
#[command(version)]
struct Cli {
    /// JSON or YAML file with project definitions (overrides GITHUB_PROJECTS)
    #[arg(long, global = true, env = "GITHUB_PROJECTS_FILE")]
    projects_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard tools over MCP on stdin/stdout
    Mcp,

    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8090", env = "PORT")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// List configured projects
    Projects {
        /// Only projects carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Repository overview and URL health for a project
    Status {
        /// Project ID
        project_id: String,
    },

    /// Recent workflow runs, deployments and releases for a project
    Deployments {
        /// Project ID
        project_id: String,

        /// Maximum entries per source
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Pull requests for a project
    Prs {
        /// Project ID
        project_id: String,

        /// open, closed or all
        #[arg(short, long, default_value = "open")]
        state: ItemState,

        /// Maximum PRs to return
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Issues for a project (pull requests excluded)
    Issues {
        /// Project ID
        project_id: String,

        /// open, closed or all
        #[arg(short, long, default_value = "open")]
        state: ItemState,

        /// Label filter (repeatable)
        #[arg(long = "label")]
        labels: Vec<String>,

        /// Maximum issues to return
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays a clean MCP/JSON channel
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let config = DashboardConfig::from_env(cli.projects_file.as_deref())?;
    let engine = StatusEngine::from_config(config)?;

    let (tool, args) = match cli.command {
        Commands::Mcp => {
            project_dashboard::mcp::serve_stdio(&engine).await?;
            return Ok(());
        }

        Commands::Serve { port, host } => {
            let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
            let projects = engine.registry().len();
            let router = create_router(Arc::new(AppState::new(engine)));

            tracing::info!(%addr, projects, "Starting Project Dashboard");

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await?;
            return Ok(());
        }

        Commands::Projects { tag } => ("list_projects", json!({ "tag": tag })),

        Commands::Status { project_id } => {
            ("get_project_status", json!({ "project_id": project_id }))
        }

        Commands::Deployments { project_id, limit } => (
            "get_deployments",
            json!({ "project_id": project_id, "limit": limit }),
        ),

        Commands::Prs {
            project_id,
            state,
            limit,
        } => (
            "list_prs",
            json!({ "project_id": project_id, "state": state, "limit": limit }),
        ),

        Commands::Issues {
            project_id,
            state,
            labels,
            limit,
        } => (
            "list_issues",
            json!({
                "project_id": project_id,
                "state": state,
                "labels": labels,
                "limit": limit,
            }),
        ),
    };

    run_tool(&engine, tool, args).await
}

async fn run_tool(engine: &StatusEngine, tool: &str, args: Value) -> anyhow::Result<()> {
    match tools::call_tool(&tools::all_tools(), engine, tool, args).await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
