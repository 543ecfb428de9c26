//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// blockdoc - Inspect, normalize and restructure block documents
#[derive(Parser, Debug)]
#[command(name = "blockdoc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List the blocks of a document
    ///
    /// Block ids are positional (b1, b2, ...) and can be passed to `set`.
    Parse {
        /// Document to read
        file: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Normalize a document's markup
    ///
    /// Prints the normalized text unless --check or --write is given.
    Fmt {
        /// Document to format
        file: PathBuf,

        /// Exit with an error if the file is not normalized
        #[arg(long, conflicts_with = "write")]
        check: bool,

        /// Rewrite the file in place
        #[arg(long)]
        write: bool,
    },

    /// Put every data block of a type onto a template's field schema
    ///
    /// Fields missing from the template are removed. Asks for confirmation
    /// before writing unless --yes is given.
    ///
    /// Examples:
    ///   blockdoc sync notes.md --template contact.toml --dry-run
    ///   blockdoc sync notes.md -t contact.yaml --yes
    Sync {
        /// Document to restructure
        file: PathBuf,

        /// Schema template (.toml, .json, .yaml or .yml)
        #[arg(short, long)]
        template: PathBuf,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Append a new data record built from a template
    Add {
        /// Document to extend
        file: PathBuf,

        /// Schema template (.toml, .json, .yaml or .yml)
        #[arg(short, long)]
        template: PathBuf,

        /// Insert after this block id instead of at the end
        #[arg(long)]
        after: Option<String>,
    },

    /// Set one field of a data block
    ///
    /// `true`/`false` become booleans and numeric text becomes a number.
    Set {
        /// Document to edit
        file: PathBuf,

        /// Block id as shown by `parse`
        block: String,

        /// Field name
        key: String,

        /// New value
        value: String,
    },

    /// Check or bump template version strings
    Version {
        #[command(subcommand)]
        action: VersionAction,
    },

    /// Format a record id
    Id {
        /// Sequence number
        sequence: u64,

        /// Id prefix
        #[arg(long, default_value = "ID")]
        prefix: String,

        /// Text between prefix and number
        #[arg(long, default_value = "-")]
        separator: String,

        /// Minimum number width, zero-padded
        #[arg(long, default_value_t = 4)]
        digits: usize,
    },
}

/// Version subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum VersionAction {
    /// Validate a version string
    Check {
        /// Version to validate, e.g. 1.2 or 1.2.3
        raw: String,
    },

    /// Print the next major or minor version
    Bump {
        /// Component to increment
        #[arg(value_enum)]
        part: BumpPart,

        /// Current version (defaults to 1.0)
        raw: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpPart {
    Major,
    Minor,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_args() {
        let cli = Cli::parse_from(["blockdoc"]);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_global_verbose_after_subcommand() {
        let cli = Cli::parse_from(["blockdoc", "parse", "doc.md", "-v"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Some(Commands::Parse {
                file: PathBuf::from("doc.md"),
                json: false
            })
        );
    }

    #[test]
    fn parse_sync_command() {
        let cli = Cli::parse_from([
            "blockdoc", "sync", "doc.md", "-t", "contact.toml", "--dry-run",
        ]);
        match cli.command {
            Some(Commands::Sync {
                template,
                dry_run,
                yes,
                ..
            }) => {
                assert_eq!(template, PathBuf::from("contact.toml"));
                assert!(dry_run);
                assert!(!yes);
            }
            other => panic!("Expected Sync, got {other:?}"),
        }
    }

    #[test]
    fn sync_requires_template() {
        assert!(Cli::try_parse_from(["blockdoc", "sync", "doc.md"]).is_err());
    }

    #[test]
    fn fmt_check_conflicts_with_write() {
        assert!(Cli::try_parse_from(["blockdoc", "fmt", "a.md", "--check", "--write"]).is_err());
    }

    #[test]
    fn parse_version_bump() {
        let cli = Cli::parse_from(["blockdoc", "version", "bump", "minor", "1.2"]);
        assert_eq!(
            cli.command,
            Some(Commands::Version {
                action: VersionAction::Bump {
                    part: BumpPart::Minor,
                    raw: Some("1.2".to_string())
                }
            })
        );
    }

    #[test]
    fn parse_id_defaults() {
        let cli = Cli::parse_from(["blockdoc", "id", "7"]);
        assert_eq!(
            cli.command,
            Some(Commands::Id {
                sequence: 7,
                prefix: "ID".to_string(),
                separator: "-".to_string(),
                digits: 4
            })
        );
    }
}
