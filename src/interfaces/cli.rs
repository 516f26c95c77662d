use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "lt")]
#[command(about = "Translate text through OpenAI-compatible LLM providers.")]
#[command(version)]
pub struct Cli {
    /// Target language (e.g. 'English', '简体中文')
    #[arg(short = 'l', long)]
    pub target_lang: Option<String>,

    /// Source language, auto-detected when omitted
    #[arg(short = 's', long)]
    pub source_lang: Option<String>,

    /// Provider: siliconflow, deepseek, moonshot, openai, ollama, modelscope, openrouter, custom
    #[arg(short = 'p', long)]
    pub platform: Option<String>,

    /// API key (overrides <PLATFORM>_API_KEY; visible in shell history)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// API base URL (overrides <PLATFORM>_BASE_URL)
    #[arg(short = 'u', long)]
    pub base_url: Option<String>,

    /// Model name (overrides <PLATFORM>_MODEL)
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Wait for the whole translation instead of streaming
    #[arg(long)]
    pub no_stream: bool,

    /// Print raw SSE frames while streaming
    #[arg(long, conflicts_with = "no_stream")]
    pub sse: bool,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Edit configuration file
    #[arg(long)]
    pub edit_config: bool,

    /// Show providers and configuration status
    #[arg(long)]
    pub status: bool,

    /// Text to translate
    #[arg(num_args = 1..)]
    pub text: Vec<String>,
}
