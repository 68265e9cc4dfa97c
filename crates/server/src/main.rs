use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use hackide_judge::{JudgeClient, PollingRunner};
use hackide_server::api::{AppState, create_router};
use hackide_server::config::{DEFAULT_CONFIG_PATH, ServerConfig};
use hackide_server::{db, seed};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hackide-server")]
#[command(about = "Contest, proctoring and online IDE server")]
struct Cli {
    /// 配置文件路径。
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// 启动 HTTP 服务（默认）。
    Serve(ServeArgs),
    /// 写入示例比赛、题目与订阅套餐后退出。
    Seed,
}

#[derive(Debug, Default, Args)]
struct ServeArgs {
    /// 覆盖配置中的监听地址。
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    info!("starting hackide server");
    let mut config = ServerConfig::load(&cli.config)
        .with_context(|| format!("failed to load server config from {}", cli.config.display()))?;

    let db = db::init_pool_and_migrate(&config.database_url)
        .await
        .context("failed to initialize database")?;
    info!("database ready");

    let runner = Arc::new(PollingRunner::new(config.judge.clone()));
    let state = AppState::new(db, runner, JudgeClient::new(config.judge.clone()));

    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Seed => run_seed(&state).await,
        Commands::Serve(args) => {
            if let Some(bind) = args.bind {
                config.bind = bind;
            }
            serve(state, &config.bind).await
        }
    }
}

async fn run_seed(state: &AppState) -> anyhow::Result<()> {
    let report = seed::seed(state, Utc::now())
        .await
        .context("failed to seed sample data")?;
    info!(
        contests = report.contests_created,
        problems = report.problems_created,
        plans = report.plans_created,
        "seed complete"
    );
    Ok(())
}

async fn serve(state: AppState, bind: &str) -> anyhow::Result<()> {
    let app = create_router(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!(addr = %bind, "server is ready, press Ctrl+C to shut down");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received, stopping server");
        })
        .await
        .context("server error")?;

    info!("server shutdown complete");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
