//! Command-line front-end for a running Gemini Image Gen proxy.

use clap::Parser;
use gemini_image_gen::{client::{ImageClient, Session}, image::download};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "imagegen")]
#[command(about = "Generate an image from a text prompt through the Gemini Image Gen proxy")]
#[command(version)]
struct Cli {
    /// The text prompt describing the image
    prompt: String,

    /// Base URL of the proxy
    #[arg(long, env = "IMAGEGEN_SERVER", default_value = "http://localhost:8080")]
    server: String,

    /// Directory the generated image is written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the data URL instead of writing a file
    #[arg(long)]
    data_url: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let client = ImageClient::new(&cli.server);
    let mut session = Session::new(cli.prompt);

    if !session.submit(&client).await {
        anyhow::bail!("prompt is empty");
    }
    if let Some(error) = session.error {
        anyhow::bail!(error);
    }
    let Some(image) = session.generated_image else {
        anyhow::bail!("no image was produced");
    };

    if cli.data_url {
        println!("{image}");
    } else {
        let path = download(&image, &cli.out_dir).await?;
        println!("{}", path.display());
    }
    Ok(())
}
