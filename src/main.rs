use clap::Parser;

use shortify::config::{StaticConfig, init_config};
use shortify::errors::ShortifyError;
use shortify::runtime::modes::{run_relay, run_shortener};
use shortify::runtime::{Args, Command};
use shortify::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let command = args.command();

    if command == Command::ConfigGen {
        print!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    }

    let config = init_config(&args.config);

    // guard 需要存活到程序结束，保证日志刷盘
    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            let err = ShortifyError::config(format!("{:#}", e));
            eprintln!("{}", err.format_colored());
            std::process::exit(1);
        }
    };

    match command {
        Command::Shortener => run_shortener().await,
        Command::Relay => run_relay().await,
        Command::ConfigGen => Ok(()),
    }
    .inspect_err(|e| tracing::error!("Fatal: {:#}", e))
}
