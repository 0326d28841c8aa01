//! CLI argument parsing with clap.

use clap::Parser;

/// Social media preview card generator.
#[derive(Parser, Debug)]
#[command(name = "socialcard", version, about)]
pub struct Cli {
    /// Title text.
    pub title: String,

    /// Description drawn beside the thumbnail.
    #[arg(short, long, conflicts_with = "description_file")]
    pub description: Option<String>,

    /// Path to a file containing the description.
    #[arg(short = 'D', long, conflicts_with = "description")]
    pub description_file: Option<String>,

    /// Background artwork: local path or https:// URL.
    #[arg(short, long)]
    pub art: String,

    /// Thumbnail image: local path or https:// URL (configured default if omitted).
    #[arg(short, long)]
    pub image: Option<String>,

    /// Tag whose icon is shown in the footer (repeatable).
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Squash the finished card to this width and 630px high.
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Output file path.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the description from either the flag or the file flag.
    ///
    /// # Errors
    ///
    /// Returns an error if neither is provided, or if the file cannot be read.
    pub fn resolve_description(&self) -> Result<String, std::io::Error> {
        if let Some(ref text) = self.description {
            Ok(text.clone())
        } else if let Some(ref path) = self.description_file {
            std::fs::read_to_string(path)
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Provide a description with -d/--description or -D/--description-file",
            ))
        }
    }
}
