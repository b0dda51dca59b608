use clap::Parser;

use redilink::cli::Cli;
use redilink::interfaces::cli::run_cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run_cli(cli).await {
        eprintln!("{}", e.format_colored());
        std::process::exit(e.exit_code());
    }
}
