//! 트레이딩 봇 설정 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 사용할 설정 파일 경로 확인
//! tradebot path
//!
//! # 설정 검증 (실패 시 0이 아닌 종료 코드)
//! tradebot check
//! tradebot --config configs/production.yaml check
//!
//! # 자격증명을 가린 최종 설정 출력
//! tradebot show
//! ```

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tradebot_cli::commands::{check::check_config, path::print_paths, show::show_config};
use tradebot_core::{ConfigSources, CONFIG_FILE_ENV};

#[derive(Parser)]
#[command(name = "tradebot")]
#[command(about = "Trading bot configuration CLI - 설정 확인 및 검증 도구", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로 (기본: configs/config.yaml)
    #[arg(short, long, global = true, env = CONFIG_FILE_ENV)]
    config: Option<PathBuf>,

    /// dotenv 파일 경로 (기본: configs/.env)
    #[arg(long, global = true)]
    dotenv: Option<PathBuf>,

    /// dotenv 파일을 읽지 않음
    #[arg(long, global = true, conflicts_with = "dotenv")]
    no_dotenv: bool,

    /// 상세 로그 출력
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 사용할 설정 파일 경로 출력
    Path,

    /// 설정 로드 및 검증
    Check,

    /// 자격증명을 가린 최종 설정을 JSON으로 출력
    Show,
}

impl Cli {
    fn sources(&self) -> ConfigSources {
        let mut sources = ConfigSources::default();
        if let Some(config) = &self.config {
            sources.config_file = config.clone();
        }
        if self.no_dotenv {
            sources.dotenv_file = None;
        } else if let Some(dotenv) = &self.dotenv {
            sources.dotenv_file = Some(dotenv.clone());
        }
        sources
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 출력은 stdout, 로그는 stderr
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let sources = cli.sources();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Path => print_paths(&sources, &mut stdout)?,
        Commands::Check => check_config(sources, &mut stdout)?,
        Commands::Show => show_config(&sources, &mut stdout)?,
    }

    Ok(())
}
