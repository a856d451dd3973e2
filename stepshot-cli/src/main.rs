use anyhow::Result;
use std::env;
use stepshot::ActionRecorder;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

fn init_logging() -> Result<()> {
    let log_level = env::var("LOG_LEVEL")
        .map(|level| match level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            _ => Level::INFO,
        })
        .unwrap_or(Level::INFO);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let output_root = env::current_dir()?;
    let mut recorder = ActionRecorder::new(&output_root)?;
    recorder.start().await?;

    // The terminate key ends the session; Ctrl+C is the equivalent
    // external stop signal.
    tokio::select! {
        _ = recorder.wait() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C received, stopping");
            recorder.session().request_stop();
        }
    }

    let artifacts = recorder.stop().await?;
    for artifact in &artifacts {
        println!("{}", artifact.display());
    }
    Ok(())
}
