//! Roshambo player - terminal client composition root.

use tokio::io::BufReader;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roshambo_player::application::{ControlFlow, SessionController, SessionInput, UserIntent};
use roshambo_player::config::ClientConfig;
use roshambo_player::infrastructure::websocket::WebSocketConnector;
use roshambo_player::ui::{read_intents, TerminalRenderer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the game on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roshambo_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!(server_url = %config.server_url, "Starting Roshambo player");

    let connector = WebSocketConnector::new(&config, Handle::current());
    let (renderer, view) = TerminalRenderer::new(std::io::stdout());
    let (inputs_tx, mut inputs_rx) = mpsc::unbounded_channel();

    let reader_tx = inputs_tx.clone();
    let reader = tokio::spawn(async move {
        let result = read_intents(
            BufReader::new(tokio::io::stdin()),
            view,
            reader_tx.clone(),
            std::io::stdout(),
        )
        .await;
        // A failed read still ends the program
        let _ = reader_tx.send(SessionInput::User(UserIntent::Quit));
        result
    });

    let mut controller = SessionController::new(connector, renderer, inputs_tx);
    controller.start();

    while let Some(input) = inputs_rx.recv().await {
        if controller.dispatch(input) == ControlFlow::Quit {
            break;
        }
    }

    match reader.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(error = %e, "Failed reading input"),
        Err(e) => tracing::warn!(error = %e, "Input task failed"),
    }
    tracing::info!("Goodbye");
    Ok(())
}
