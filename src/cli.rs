use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate a single JSON file
    Translate {
        /// Input JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Translation engine (openai, amazon, local)
        #[arg(short, long, default_value = "openai")]
        engine: String,

        /// Document mode (general, blog, local)
        #[arg(short, long, default_value = "general")]
        mode: String,

        /// Target languages (comma-separated); defaults to the saved language list
        #[arg(short, long)]
        targets: Option<String>,

        /// Source language code; defaults to the configured one
        #[arg(short, long)]
        source: Option<String>,

        /// Directory for output files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Translate every JSON file in a directory
    Batch {
        /// Input directory containing JSON files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Translation engine (openai, amazon, local)
        #[arg(short, long, default_value = "openai")]
        engine: String,

        /// Document mode (general, blog, local)
        #[arg(short, long, default_value = "general")]
        mode: String,

        /// Target languages (comma-separated); defaults to the saved language list
        #[arg(short, long)]
        targets: Option<String>,

        /// Source language code; defaults to the configured one
        #[arg(short, long)]
        source: Option<String>,

        /// Directory for output files, mirroring the input tree
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Check that an engine is reachable with the stored credentials
    Verify {
        /// Translation engine (openai, amazon, local)
        #[arg(short, long, default_value = "openai")]
        engine: String,
    },

    /// List document modes
    Modes,

    /// Manage the saved target languages
    Languages {
        #[command(subcommand)]
        action: LanguageAction,
    },

    /// Manage engine credentials
    Credentials {
        #[command(subcommand)]
        action: CredentialAction,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum LanguageAction {
    /// Show saved target languages
    List {
        /// Also show every known language code
        #[arg(long)]
        all: bool,
    },

    /// Add a target language by ISO code
    Add { code: String },

    /// Remove a target language
    Remove { code: String },
}

#[derive(Subcommand)]
pub enum CredentialAction {
    /// Store credentials for an engine
    Set {
        /// Engine the credentials belong to (openai, amazon)
        #[arg(short, long)]
        engine: String,

        /// OpenAI API key
        #[arg(long)]
        api_key: Option<String>,

        /// AWS access key id
        #[arg(long)]
        access_key: Option<String>,

        /// AWS secret access key
        #[arg(long)]
        secret_key: Option<String>,
    },

    /// Remove stored credentials for one engine, or all of them
    Clear {
        #[arg(short, long)]
        engine: Option<String>,
    },

    /// Show stored credentials with secrets masked
    Show,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a config file populated with defaults
    Init {
        /// Destination file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Split a comma-separated language list, dropping blanks
pub fn parse_language_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_arguments() {
        let args = Args::parse_from([
            "jsonlingo", "-v", "translate", "-i", "post.json", "-e", "amazon", "-m", "blog", "-t", "fr, es",
        ]);
        assert!(args.verbose);
        match args.command {
            Commands::Translate { input, engine, mode, targets, source, .. } => {
                assert_eq!(input, PathBuf::from("post.json"));
                assert_eq!(engine, "amazon");
                assert_eq!(mode, "blog");
                assert_eq!(parse_language_list(&targets.unwrap()), vec!["fr", "es"]);
                assert!(source.is_none());
            }
            _ => panic!("expected translate"),
        }
    }

    #[test]
    fn language_list_drops_blanks() {
        assert_eq!(parse_language_list("ar,,fr , "), vec!["ar", "fr"]);
    }
}
