use clap::{Parser, Subcommand};
use invoice_subset_matcher::{
    api::{self, ApiState},
    cli::Menu,
    AppConfig, Session, Strategy, SubsetMatcher, ToleranceMode,
};
use std::io;
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

/// 发票子集匹配: 在容差窗口内找合计最接近 target 的发票组合
#[derive(Debug, Parser)]
#[command(name = "invoice-subset-matcher", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// 覆盖配置中的搜索策略
    #[arg(long, global = true, value_enum)]
    strategy: Option<Strategy>,

    /// 覆盖配置中的容差语义
    #[arg(long, global = true, value_enum)]
    tolerance_mode: Option<ToleranceMode>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 交互菜单 (默认)
    Menu,
    /// 启动 HTTP 服务
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = AppConfig::from_env()?;
    if let Some(strategy) = cli.strategy {
        config.matcher.strategy = strategy;
    }
    if let Some(mode) = cli.tolerance_mode {
        config.matcher.tolerance_mode = mode;
    }

    // 初始化日志 - 本地时间格式, 输出到 stderr (stdout 留给菜单)
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_max_level(config.log_level())
        .with_writer(io::stderr)
        .init();

    info!("Starting with config: {:?}", config);

    let matcher = SubsetMatcher::new(config.matcher.clone());

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            let session = Session::new(&config.session);
            let stdin = io::stdin();
            let mut menu = Menu::new(
                session,
                &matcher,
                config.session.exit_on_missing_target,
                stdin.lock(),
                io::stdout(),
            );
            let exit = menu.run()?;
            info!("Menu exited: {:?}", exit);
        }
        Command::Serve => {
            let state = Arc::new(ApiState {
                matcher,
                default_tolerance: config.session.default_tolerance,
            });
            let app = api::router(state).layer(ServiceBuilder::new());

            let addr = format!("{}:{}", config.server.host, config.server.port);
            info!("Server listening on {}", addr);
            info!("API Endpoints:");
            info!("  GET  /health");
            info!("  POST /api/match/closest");

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
