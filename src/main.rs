use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use modelwrap_core::{AppConfig, AudioInput, Describe};
use modelwrap_generate::{GenerationComponent, GenerationRegistry};
use modelwrap_transcribe::{BackendRegistry, TranscriptionComponent};
use std::path::PathBuf;
use toml::{Table, Value};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modelwrap", about = "Speech transcription and text generation wrappers")]
struct Cli {
    /// Path to the configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe audio files with the configured speech backend
    Transcribe {
        /// Open each file and hand the backend a binary stream instead of a path
        #[arg(long)]
        stream: bool,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Generate text for a prompt with the configured generation backend
    Generate {
        prompt: String,

        /// Per-call generation parameter, e.g. `--param temperature=0.8`
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// Print the component descriptors for the current configuration
    Describe,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => AppConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {:?}", path))?,
        None => AppConfig::default(),
    };

    let env_filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false),
    );

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    match cli.command {
        Command::Transcribe { stream, files } => transcribe(&config, stream, files).await,
        Command::Generate { prompt, params } => generate(&config, &prompt, &params).await,
        Command::Describe => describe(&config),
    }
}

async fn transcribe(config: &AppConfig, stream: bool, files: Vec<PathBuf>) -> Result<()> {
    let registry = BackendRegistry::new();
    let component = TranscriptionComponent::from_config(&config.transcription, &registry)
        .with_context(|| {
            format!(
                "failed to create transcriber with backend '{}'",
                config.transcription.backend
            )
        })?;

    tracing::info!(
        backend = component.backend_name(),
        model = component.model(),
        device = component.device(),
        "warming up"
    );
    component.warm_up().await.context("failed to load speech model")?;

    let mut inputs = Vec::with_capacity(files.len());
    for path in files {
        if stream {
            let file = std::fs::File::open(&path)
                .with_context(|| format!("failed to open {:?}", path))?;
            inputs.push(AudioInput::stream(file));
        } else {
            inputs.push(AudioInput::from(path));
        }
    }

    let output = component.run(inputs).await.context("transcription failed")?;
    for document in output.documents {
        let (content, meta) = document.into_parts();
        println!("{content}");
        let meta = toml::to_string(&meta).context("failed to render metadata")?;
        println!("{}", meta.trim_end());
        println!();
    }
    Ok(())
}

async fn generate(config: &AppConfig, prompt: &str, params: &[String]) -> Result<()> {
    let Some(ref gen_config) = config.generation else {
        bail!("no [generation] section in config");
    };

    let registry = GenerationRegistry::new();
    let component = GenerationComponent::from_config(gen_config, &registry).with_context(|| {
        format!(
            "failed to create generator with backend '{}'",
            gen_config.backend
        )
    })?;

    let overrides = parse_params(params)?;
    let overrides = (!overrides.is_empty()).then_some(overrides);
    let result = component
        .run(prompt, overrides.as_ref())
        .await
        .context("generation failed")?;

    for reply in result.replies() {
        println!("{reply}");
    }
    Ok(())
}

fn describe(config: &AppConfig) -> Result<()> {
    let transcriber =
        TranscriptionComponent::from_config(&config.transcription, &BackendRegistry::new())
            .context("failed to create transcriber")?;
    let text = transcriber
        .to_descriptor()
        .to_toml_string()
        .context("failed to encode transcriber descriptor")?;
    println!("{}", text.trim_end());

    if let Some(ref gen_config) = config.generation {
        let generator = GenerationComponent::from_config(gen_config, &GenerationRegistry::new())
            .context("failed to create generator")?;
        let text = generator
            .to_descriptor()
            .to_toml_string()
            .context("failed to encode generator descriptor")?;
        println!();
        println!("{}", text.trim_end());
    }
    Ok(())
}

fn parse_params(raw: &[String]) -> Result<Table> {
    let mut params = Table::new();
    for entry in raw {
        let Some((key, value)) = entry.split_once('=') else {
            bail!("invalid parameter '{entry}', expected KEY=VALUE");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("invalid parameter '{entry}', empty key");
        }
        params.insert(key.to_string(), parse_scalar(value.trim()));
    }
    Ok(params)
}

/// TOML scalar if `raw` parses as one, otherwise the raw string.
fn parse_scalar(raw: &str) -> Value {
    format!("v = {raw}")
        .parse::<Table>()
        .ok()
        .and_then(|mut t| t.remove("v"))
        .unwrap_or_else(|| Value::String(raw.to_string()))
}
