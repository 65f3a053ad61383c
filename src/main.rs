use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use subjectless::pipeline::{
    CostMode, GenerationRequest, Language, PromptGenerator, SanitizerStrength, TemplateMode,
};
use subjectless::{config, init_tracing, presets, vision};

#[derive(Parser, Debug)]
#[command(name = "subjectless")]
#[command(version, about = "Generate subjectless environment prompts for image models")]
struct Cli {
    /// Catalog preset name
    #[arg(short, long, default_value = presets::DEFAULT_PRESET)]
    preset: String,

    /// Free text replacing the catalog preset
    #[arg(long, default_value = "")]
    preset_override: String,

    #[arg(short, long, default_value = "")]
    style: String,

    /// Environmental props (objects only)
    #[arg(long, default_value = "")]
    props: String,

    #[arg(short, long, default_value = "de")]
    language: Language,

    /// neutral, cinematic, photography, illustration or product
    #[arg(short, long, default_value = "photography")]
    tone: String,

    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    detail: u8,

    #[arg(long, default_value_t = 350, value_parser = clap::value_parser!(u32).range(64..=2000))]
    max_tokens: u32,

    #[arg(long, default_value_t = 0.0)]
    temperature: f32,

    /// Model used when cost mode is premium
    #[arg(short, long, default_value = "gpt-4o")]
    model: String,

    /// Model that beats every cost mode
    #[arg(long, default_value = "")]
    model_override: String,

    #[arg(long, default_value = "auto")]
    template_mode: TemplateMode,

    #[arg(long, default_value = "auto")]
    cost_mode: CostMode,

    #[arg(long, default_value = "strict")]
    sanitizer: SanitizerStrength,

    /// Skip cache reads and writes
    #[arg(long)]
    no_cache: bool,

    /// Durable cache TTL in days (0 = never expire)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=365))]
    cache_ttl_days: u32,

    /// Keep trailing punctuation from the model output
    #[arg(long)]
    keep_trailing_punctuation: bool,

    /// Image used as environmental context
    #[arg(short, long, value_name = "FILE")]
    image: Option<PathBuf>,

    /// Print catalog preset names and exit
    #[arg(long)]
    list_presets: bool,
}

impl Cli {
    fn into_request(self) -> Result<GenerationRequest, vision::VisionError> {
        let image = self.image.as_deref().map(vision::load_image).transpose()?;
        Ok(GenerationRequest {
            model: self.model,
            model_override: self.model_override,
            preset: self.preset,
            preset_override: self.preset_override,
            style_addon: self.style,
            props: self.props,
            language: self.language,
            tone: self.tone,
            detail_level: self.detail,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            template_mode: self.template_mode,
            cost_mode: self.cost_mode,
            use_cache: !self.no_cache,
            cache_ttl_days: self.cache_ttl_days,
            sanitizer_strength: self.sanitizer,
            strip_trailing_punctuation: !self.keep_trailing_punctuation,
            image,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list_presets {
        for name in presets::names() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    init_tracing();
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);

    let request = match cli.into_request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    let generator = match PromptGenerator::from_env() {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    match generator.generate(&request) {
        Ok(prompt) => {
            println!("{prompt}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
