use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use virtual_stylist::encoder::{encode_path, extension_for_mime, EncodedImage, PreviewRegistry};
use virtual_stylist::{Config, GeminiClient, GenerationService, PromptConstructor, StyleCategory, Stylist};

#[derive(Parser, Debug)]
#[command(name = "stylist", about = "CLI for the Virtual Stylist", version)]
struct Cli {
    /// Override GEMINI_API_BASE
    #[arg(global = true, long)]
    gemini_url: Option<String>,

    /// Override GEMINI_MODEL
    #[arg(global = true, long)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate one outfit per style around a clothing photo
    Generate {
        /// Photo of the clothing item
        #[arg(long, value_name = "PATH")]
        image: PathBuf,
        /// Output directory (defaults to OUTPUT_DIR)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Refine a previously generated outfit image
    Edit {
        /// Outfit image to refine
        #[arg(long, value_name = "PATH")]
        image: PathBuf,
        /// What to change, e.g. "add a red scarf"
        #[arg(long, value_name = "TEXT")]
        prompt: String,
        /// Output path (defaults to <image>-edited.<ext>, ext from the returned image type)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// List the styles and the instruction sent for each
    Styles,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Load env and parse CLI
    Config::dotenv_load();
    let cli = Cli::parse();

    if let Commands::Styles = cli.command {
        let prompts = PromptConstructor::new();
        for style in StyleCategory::ALL {
            println!("{} ({})", style.label(), style.slug());
            println!("  {}", prompts.style_instruction(style)?);
        }
        return Ok(());
    }

    let mut conf = Config::new()?;
    if let Some(url) = cli.gemini_url {
        conf.gemini_api_base = url;
    }
    if let Some(model) = cli.model {
        conf.gemini_model = model;
    }
    let client = GeminiClient::from_config(&conf);

    match cli.command {
        Commands::Generate { image, out } => {
            let previews = PreviewRegistry::new();
            let item = encode_path(&previews, &image).await?;
            let stylist = Stylist::new(Arc::new(client), previews);
            stylist.upload(item).await;

            eprintln!("Styling {} in {} looks...", image.display(), StyleCategory::ALL.len());
            let Some(report) = stylist.start_styling().await else {
                eprintln!("Error: no item uploaded");
                std::process::exit(2);
            };
            for failure in &report.failed {
                eprintln!("{} unavailable: {}", failure.style.label(), failure.reason);
            }
            if report.is_failed() {
                let view = stylist.snapshot().await;
                eprintln!("Error: {}", view.error.unwrap_or_default());
                std::process::exit(1);
            }

            let dir = out.unwrap_or_else(|| PathBuf::from(&conf.output_dir));
            tokio::fs::create_dir_all(&dir).await?;
            for outfit in stylist.outfits().await {
                let file = stylist.download(&outfit.id).await?;
                let path = dir.join(&file.file_name);
                tokio::fs::write(&path, &file.bytes).await?;
                println!("Saved {} {} ({} bytes)", outfit.style.label(), path.display(), file.bytes.len());
            }
            Ok(())
        }
        Commands::Edit { image, prompt, out } => {
            if prompt.trim().is_empty() {
                eprintln!("Error: --prompt must not be empty");
                std::process::exit(2);
            }
            let previews = PreviewRegistry::new();
            let item = encode_path(&previews, &image).await?;
            let edited = match client.edit_image(&item.encoded.to_data_uri(), &prompt).await {
                Ok(uri) => EncodedImage::from_data_uri(&uri)?,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            let path = out.unwrap_or_else(|| edited_path(&image, &edited.mime_type));
            let bytes = edited.decode()?;
            tokio::fs::write(&path, &bytes).await?;
            println!("Saved {} ({} bytes)", path.display(), bytes.len());
            Ok(())
        }
        Commands::Styles => Ok(()),
    }
}

fn edited_path(original: &std::path::Path, mime_type: &str) -> PathBuf {
    let stem = original.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "outfit".to_string());
    original.with_file_name(format!("{}-edited.{}", stem, extension_for_mime(mime_type)))
}
