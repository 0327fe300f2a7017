use anyhow::Result;
use clap::Parser;
use hf_image_studio::ai::{HuggingFaceImageClient, ImageGenerationService, MockImageGenerationClient};
use hf_image_studio::models::Config;
use hf_image_studio::sampler::PromptSampler;
use hf_image_studio::shell::{Flow, Shell, HELP};
use hf_image_studio::workflow::GenerationWorkflow;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "hf-image-studio")]
#[command(about = "Transform your imagination into images using AI")]
struct CliArgs {
    /// Use a local placeholder generator instead of the inference service.
    #[arg(long)]
    dry_run: bool,

    /// Directory that downloaded PNG files are written to.
    #[arg(long, value_name = "DIR")]
    download_dir: Option<PathBuf>,

    /// Model ID override (for example `black-forest-labs/FLUX.1-schnell`).
    #[arg(long)]
    model: Option<String>,

    /// Initial image description.
    #[arg(long)]
    prompt: Option<String>,
}

impl CliArgs {
    fn apply(&self, config: &mut Config) {
        if self.dry_run {
            config.dry_run = true;
        }
        if let Some(dir) = &self.download_dir {
            config.download_dir = dir.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
    }
}

fn build_service(config: &Config) -> hf_image_studio::Result<Box<dyn ImageGenerationService>> {
    if config.dry_run {
        info!("DRY_RUN enabled, images will be placeholders");
        return Ok(Box::new(
            MockImageGenerationClient::new().with_model(config.model.clone()),
        ));
    }

    let token = config.huggingface_token.clone().ok_or_else(|| {
        hf_image_studio::Error::Invariant("HUGGINGFACE_TOKEN validated in Config::validate".to_string())
    })?;
    info!("Image provider: Hugging Face (model: {})", config.model);
    Ok(Box::new(HuggingFaceImageClient::new(
        token,
        config.model.clone(),
        config.inference_url.clone(),
        config.timeout,
    )?))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hf_image_studio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    args.apply(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let service = build_service(&config)?;
    let sampler = PromptSampler::builtin()?;
    let mut shell = Shell::new(
        GenerationWorkflow::new(service),
        sampler,
        config.download_dir.clone(),
    );
    if let Some(prompt) = &args.prompt {
        shell.session_mut().set_prompt_text(prompt.clone());
    }

    info!("Starting hf-image-studio session {}", shell.session().id());

    let mut stdout = std::io::stdout();
    writeln!(stdout, "AI Image Generator (model: {})", config.model)?;
    writeln!(stdout, "{}", HELP)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if shell.handle_line(&line, &mut stdout).await? == Flow::Quit {
            break;
        }
    }

    info!("Session ended");
    Ok(())
}
