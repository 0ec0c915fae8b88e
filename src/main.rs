use clap::Parser;
use food_detect::cli::{Cli, Commands};
use food_detect::config::Config;
use food_detect::error::Result;
use food_detect::output::save_annotated_image;
use food_detect::render::{render_error, render_response, render_selection};
use food_detect::submit::Submitter;
use food_detect::transport::ReqwestTransport;
use food_detect::workflow::Workflow;
use indicatif::ProgressBar;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", render_error(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Detect { image, mime, endpoint, save_image, json } => {
            println!("🍽️  food-detect - Central Asian Cuisine Recognition\n");

            let endpoint = config.resolve_endpoint(endpoint.as_deref());
            if let Some(endpoint) = &endpoint {
                debug!(url = %endpoint.url, source = %endpoint.source, "endpoint resolved");
            }
            let submitter = Submitter::new(ReqwestTransport::new(), endpoint.map(|e| e.url));
            let mut workflow = Workflow::new(submitter);

            // 1. 画像選択
            println!("[1/2] 画像を読み込み中...");
            workflow.select(&image, mime.as_deref()).await?;
            if let Some(selected) = workflow.state().selected() {
                println!("{}\n", render_selection(selected));
            }

            // 2. 送信
            println!("[2/2] 解析中...");
            let spinner = ProgressBar::new_spinner();
            spinner.set_message("Analyzing Your Dish...");
            spinner.enable_steady_tick(Duration::from_millis(100));
            let outcome = workflow.submit().await;
            spinner.finish_and_clear();
            let response = outcome?;
            println!("✔ 解析完了\n");

            println!("{}", render_response(&response, workflow.state().selected()));

            if json {
                println!("\n{}", serde_json::to_string_pretty(&response)?);
            }

            if let Some(path) = save_image {
                let written = save_annotated_image(&response, &path).await?;
                println!("\n✔ 検出画像を保存: {} ({} bytes)", path.display(), written);
            }
        }

        Commands::Config { set_endpoint, show } => {
            let mut config = config;

            if let Some(url) = set_endpoint {
                config.set_endpoint(url)?;
                println!("✔ エンドポイントを設定しました");
            }

            if show {
                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                match config.resolve_endpoint(None) {
                    Some(endpoint) => {
                        println!("  エンドポイント: {} ({})", endpoint.url, endpoint.source)
                    }
                    None => println!("  エンドポイント: 未設定"),
                }
            }
        }
    }

    Ok(())
}
