use anyhow::Result;
use clap::{Parser, Subcommand};
use leaflens::app::{App, IdentifyRequest};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "leaflens")]
#[command(about = "Identify plants with Gemini and look up care tips")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Identify a plant from a free-text description.
    Text {
        /// Plant description, e.g. "trailing vine with heart-shaped leaves".
        description: String,
    },
    /// Identify a plant from a photo.
    Image {
        /// Path to a JPEG/PNG/WebP/HEIC photo.
        path: PathBuf,
    },
    /// Save a Gemini API key for this and future runs.
    SetKey {
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leaflens=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    match args.command {
        Command::SetKey { key } => {
            if let Err(e) = app.save_api_key(&key) {
                error!("Failed to save API key: {}", e);
                std::process::exit(1);
            }
            info!("API key saved");
            Ok(())
        }
        Command::Text { description } => identify(&app, IdentifyRequest::Text(description)).await,
        Command::Image { path } => identify(&app, IdentifyRequest::Image(path)).await,
    }
}

async fn identify(app: &App, request: IdentifyRequest) -> Result<()> {
    match app.run(request).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            error!("Identification failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CliArgs, Command};
    use clap::Parser;

    #[test]
    fn test_parse_text_subcommand() {
        let args = CliArgs::try_parse_from(["leaflens", "text", "spiky succulent"]).unwrap();
        assert!(matches!(args.command, Command::Text { ref description } if description == "spiky succulent"));
    }

    #[test]
    fn test_parse_image_subcommand() {
        let args = CliArgs::try_parse_from(["leaflens", "image", "photo.jpg"]).unwrap();
        assert!(matches!(args.command, Command::Image { .. }));
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(CliArgs::try_parse_from(["leaflens"]).is_err());
    }
}
