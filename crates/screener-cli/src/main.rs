//! 암호화폐 스크리너 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 기본 설정으로 스크리닝 실행
//! screener screen
//!
//! # 점수 정책과 순위 길이를 재정의하고 순차 실행
//! screener screen --policy seven_criterion --top 10 --sequential
//!
//! # 텔레그램 알림 포함
//! screener screen --notify
//!
//! # 필터를 통과한 유니버스 조회
//! screener symbols --format json
//! ```

use clap::{Parser, Subcommand};
use tracing::error;

mod commands;

use screener_core::config::AppConfig;
use screener_core::logging::{init_logging, LogConfig, LogFormat};

#[derive(Parser)]
#[command(name = "screener")]
#[command(about = "Crypto screener CLI - 바이낸스 현물 매수 후보 스크리닝", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 스크리닝 실행
    Screen {
        /// 설정 파일
        #[arg(short, long, default_value = "config/default.toml")]
        config: String,

        /// 점수 정책 재정의 (four_criterion, seven_criterion, continuous)
        #[arg(short, long)]
        policy: Option<String>,

        /// 순위 목록 길이 재정의
        #[arg(short, long)]
        top: Option<usize>,

        /// 텔레그램 알림 강제 활성화
        #[arg(long, default_value = "false")]
        notify: bool,

        /// 순차 실행 (요청 간 지연 적용)
        #[arg(long, default_value = "false")]
        sequential: bool,
    },

    /// 필터를 통과한 유니버스 종목 조회
    Symbols {
        /// 설정 파일
        #[arg(short, long, default_value = "config/default.toml")]
        config: String,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Screen {
            config,
            policy,
            top,
            notify,
            sequential,
        } => {
            let mut app_config = AppConfig::load(&config)
                .map_err(|e| anyhow::anyhow!("설정 로드 실패 ({}): {}", config, e))?;

            if let Some(policy) = policy {
                app_config.scoring.policy = policy;
            }
            if let Some(top) = top {
                app_config.pipeline.top_n = top;
            }
            if notify {
                app_config.notification.enabled = true;
                app_config.notification.telegram.enabled = true;
            }
            if sequential {
                app_config.pipeline.parallelism = 1;
            }

            init_from(&app_config)?;

            if let Err(e) = commands::screen::run_screen(app_config).await {
                error!("스크리닝 실패: {}", e);
                return Err(e);
            }
        }

        Commands::Symbols { config, format } => {
            let app_config = AppConfig::load(&config)
                .map_err(|e| anyhow::anyhow!("설정 로드 실패 ({}): {}", config, e))?;
            let format = commands::symbols::OutputFormat::parse(&format)?;

            init_from(&app_config)?;

            if let Err(e) = commands::symbols::list_symbols(app_config, format).await {
                error!("유니버스 조회 실패: {}", e);
                return Err(e);
            }
        }
    }

    Ok(())
}

/// 설정 트리의 로깅 섹션으로 트레이싱을 초기화합니다.
fn init_from(config: &AppConfig) -> anyhow::Result<()> {
    let format = config
        .logging
        .format
        .parse::<LogFormat>()
        .map_err(|e| anyhow::anyhow!(e))?;
    let log_config = LogConfig::new(config.logging.level.clone()).with_format(format);

    init_logging(log_config).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))
}
