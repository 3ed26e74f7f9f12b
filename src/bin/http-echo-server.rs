use clap::Parser;

use echo_servers::lifecycle::{signals, startup, Cli, Role, Shutdown};
use echo_servers::{HttpEchoServer, Transcript};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = startup::prepare(&cli, Role::Http)?;

    let server = HttpEchoServer::new(config.http, Transcript::stdout());
    let listener = server.bind().await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
