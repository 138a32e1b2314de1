use clap::Parser;

use golink::cli::{Cli, Commands};
use golink::config::{StaticConfig, init_config};
use golink::runtime::modes::run_server;
use golink::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(Commands::GenerateConfig { output }) = &cli.command {
        let sample = StaticConfig::generate_sample_config();
        match output {
            Some(path) => {
                std::fs::write(path, sample)?;
                println!("Sample configuration written to {}", path);
            }
            None => print!("{}", sample),
        }
        return Ok(());
    }

    let config = match init_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    run_server(config).await
}
