use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gemini-powered study tools for the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to an alternate configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chat with the school tutor
    Tutor {
        /// One-shot prompt; omit to start an interactive session
        prompt: Option<String>,

        /// Attach an image file to the prompt
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Analyze an educational image (summarize text, solve exercises)
    Analyze {
        /// Path to the image file
        image: PathBuf,

        /// Override the default analysis instruction
        #[arg(short, long)]
        prompt: Option<String>,
    },

    /// Generate a slide deck and export it as PDF and JSON
    Slides {
        /// Presentation topic
        topic: String,

        /// Generate an illustration for every slide
        #[arg(long, default_value_t = false)]
        images: bool,

        /// Output directory for the exported files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Browse the deck interactively before exporting
        #[arg(short, long, default_value_t = false)]
        interactive: bool,
    },

    /// Play a generated multiple-choice quiz
    Quiz {
        /// Quiz topic
        topic: String,
    },

    /// Generate a hierarchical mind map
    MindMap {
        /// Mind map topic
        topic: String,
    },

    /// Grade an essay against a topic on the 0-1000 scale
    Essay {
        /// Essay theme
        topic: String,

        /// Path to the essay text file
        essay_file: PathBuf,
    },

    /// Ask the library: search-grounded answers with sources
    Library {
        /// Search query
        query: String,
    },
}
