use std::path::Path;
use stepshot::ActionRecorder;
use tokio_stream::StreamExt;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut recorder = ActionRecorder::new(Path::new("."))?;
    let mut steps = recorder.step_stream();
    tokio::spawn(async move {
        while let Some(step) = steps.next().await {
            println!("Recorded step {}: {}", step.index, step.action);
        }
    });

    recorder.start().await?;
    info!("Recording. Press ESC to stop, F9 for a manual screenshot.");
    recorder.wait().await;

    let artifacts = recorder.stop().await?;
    for artifact in artifacts {
        println!("Report: {}", artifact.display());
    }
    Ok(())
}
