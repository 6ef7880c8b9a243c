//! Licensing service entry point: JSON commands in on stdin, results out on
//! stdout, logs on stderr.

use cli::{App, Config, LogFormat};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let (plain, json) = match config.log_format {
        LogFormat::Plain => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}

#[tokio::main]
async fn main() {
    // 1. Configuration and tracing
    let config = Config::from_env();
    init_tracing(&config);

    // 2. Wire the service
    let app = App::new(&config);
    tracing::info!(
        topic = %config.topic,
        license_expiration_days = config.license_expiration_days,
        "licensing service ready, reading commands from stdin"
    );

    // 3. One bus session per input line until EOF or Ctrl-C
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut handled = 0_u64;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(err) => {
                        tracing::error!(error = %err, "failed to read stdin");
                        break;
                    }
                };
                let Some(response) = app.handle_line(&line).await else {
                    continue;
                };
                handled += 1;
                let output = format!("{response}\n");
                if let Err(err) = stdout.write_all(output.as_bytes()).await {
                    tracing::error!(error = %err, "failed to write response");
                    break;
                }
                if let Err(err) = stdout.flush().await {
                    tracing::error!(error = %err, "failed to flush stdout");
                    break;
                }
            }
            _ = signal::ctrl_c() => {
                tracing::info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    tracing::info!(handled, "licensing service stopped");
}
