//! CLI argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::prompt::Subject;

#[derive(Parser, Debug)]
#[command(name = "studymate")]
#[command(author, version, about = "Exam-preparation study assistant with streaming replies", long_about = None)]
pub struct Cli {
    /// Chat endpoint URL (proxy function or chat-completions API)
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Talk to an OpenAI-compatible gateway instead of the study proxy
    #[arg(long, global = true)]
    pub gateway: bool,

    /// Model to request (gateway mode only)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Whole-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a single question and print the streamed answer
    Ask {
        /// Question text
        prompt: Vec<String>,

        /// Attach an image (repeatable)
        #[arg(short, long = "image")]
        images: Vec<PathBuf>,

        /// Start with the starter question for a subject
        #[arg(short, long)]
        subject: Option<Subject>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigSubcommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommands {
    /// Initialize a new config file
    Init,
    /// Print config file location
    Where,
}
