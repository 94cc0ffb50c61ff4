use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "deckchunk",
    version,
    about = "Segment documents into classified, slide-sized chunks",
    after_help = "Settings are read from .deckchunk/config.toml in the working directory. \
                  Run 'deckchunk config --init' to write the defaults."
)]
pub struct Cli {
    /// Log pipeline decisions (drops, fallbacks, merges) to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Indented JSON output (overrides the configured format)
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline on one document and print its deck plan.
    ///
    /// Page count comes from the document (PDF pages, form feeds in text)
    /// unless given explicitly.
    Chunk {
        /// Document path (.txt, .md, .pdf)
        path: String,
        /// Page count override (0 = unknown)
        #[arg(short, long)]
        pages: Option<u32>,
        /// Keep every chunk instead of truncating to the slide budget
        #[arg(long)]
        no_budget: bool,
        /// Include the per-stage pipeline report
        #[arg(long)]
        report: bool,
    },

    /// Show paragraph filter verdicts, dropped chunks and the tokenizer used
    Inspect {
        /// Document path
        path: String,
    },

    /// Slide target and chunk cap for a page count
    Budget {
        /// Page count (0 = unknown)
        pages: u32,
    },

    /// Chunk every supported document under a directory in parallel
    Batch {
        /// Directory (default: current directory)
        #[arg(default_value = ".")]
        dir: String,
    },

    /// Print the slide-generation prompt for each chunk
    Prompts {
        /// Document path
        path: String,
        /// Page count override (0 = unknown)
        #[arg(short, long)]
        pages: Option<u32>,
    },

    /// Assemble slides from raw generator responses, falling back per chunk
    Slides {
        /// Document path
        path: String,
        /// JSON array of raw response strings, in chunk order
        #[arg(short, long)]
        responses: Option<String>,
        /// Page count override (0 = unknown)
        #[arg(short, long)]
        pages: Option<u32>,
    },

    /// Print effective settings, or write the defaults
    Config {
        /// Write .deckchunk/config.toml with default settings
        #[arg(long)]
        init: bool,
    },
}
