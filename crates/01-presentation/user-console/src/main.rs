use clap::Parser;
use user_console::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    user_console::run(&cli).await
}
