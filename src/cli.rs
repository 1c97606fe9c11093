use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bibclip", version)]
#[command(about = "Copy BibTeX citations from a bibliography or publication page to the clipboard", long_about = None)]
pub struct Cli {
    /// Config file path (default: ~/.bibclip/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy the text of an element (a citation key) to the clipboard
    Copy {
        id: String,

        /// BibTeX file or HTML page to look the id up in
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Wait for the confirmation to be acknowledged
        #[arg(long)]
        modal: bool,

        /// Ignore clipboard write failures
        #[arg(long)]
        silent: bool,

        /// Do not print the confirmation
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print the text that `copy` would put on the clipboard
    Show {
        id: String,

        #[arg(short, long)]
        source: Option<PathBuf>,
    },
    /// List citation keys in publication order
    List {
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Only entries tagged with this keyword (repeatable)
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_copy() {
        let cli = Cli::parse_from(["bibclip", "copy", "ref1", "-s", "refs.bib", "--silent"]);
        match cli.command {
            Commands::Copy {
                id,
                source,
                modal,
                silent,
                quiet,
            } => {
                assert_eq!(id, "ref1");
                assert_eq!(source, Some(PathBuf::from("refs.bib")));
                assert!(!modal);
                assert!(silent);
                assert!(!quiet);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_keywords() {
        let cli = Cli::parse_from(["bibclip", "list", "-k", "muc.dai", "-k", "nlp", "--json"]);
        match cli.command {
            Commands::List { keywords, json, .. } => {
                assert_eq!(keywords, vec!["muc.dai", "nlp"]);
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["bibclip", "show", "ref1", "--debug", "--config", "c.toml"]);
        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }

    #[test]
    fn test_id_required() {
        assert!(Cli::try_parse_from(["bibclip", "copy"]).is_err());
    }
}
