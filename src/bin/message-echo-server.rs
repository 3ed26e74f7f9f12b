use clap::Parser;

use echo_servers::lifecycle::{signals, startup, Cli, Role, Shutdown};
use echo_servers::{MessageEchoServer, Transcript};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = startup::prepare(&cli, Role::Message)?;

    let server = MessageEchoServer::bind(&config.message, Transcript::stdout()).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
