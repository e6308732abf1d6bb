use models::AssetKind;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "channel-studio")]
#[command(about = "Generate YouTube channel assets with Gemini", long_about = None)]
pub struct Cli {
    /// Directory holding config.toml (default: platform config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Directory for history, artifacts and logs (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Show debug output on the terminal
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn terminal_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate one asset and wait for it
    Generate(GenerateArgs),

    /// Inspect or clear past generations
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// What to generate
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Text prompt (channel name for intros)
    #[arg(long)]
    pub prompt: String,

    /// Name shown in history instead of the prompt
    #[arg(long)]
    pub label: Option<String>,

    /// Reference image (png, jpeg or webp)
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Custom banner width in pixels
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Custom banner height in pixels
    #[arg(long, requires = "width")]
    pub height: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// List past generations, newest first
    List,

    /// Delete every history entry
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Logo,
    Banner,
    Thumbnail,
    Description,
    About,
    Intro,
}

impl From<KindArg> for AssetKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Logo => AssetKind::Logo,
            KindArg::Banner => AssetKind::Banner,
            KindArg::Thumbnail => AssetKind::Thumbnail,
            KindArg::Description => AssetKind::Description,
            KindArg::About => AssetKind::About,
            KindArg::Intro => AssetKind::Intro,
        }
    }
}
