//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use crate::core::model::ExtractOptions;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::core::rules::{
    DEFAULT_MAX_FILES, DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_TOTAL_BYTES, DEFAULT_SURVEY_DEPTH,
};
use crate::core::tokenizer::TokenModel;
use crate::flows::prompt::PromptRequest;

/// codedoc - select and condense repository content for documentation prompts.
#[derive(Parser, Debug)]
#[command(name = "codedoc")]
#[command(
    author,
    version,
    about,
    long_about = r#"codedoc turns a repository into a single, size-bounded Markdown document
that can be handed to a language model to write documentation.

Files are ranked by documentation value (README, manifests, entry points,
source, docs, tests, the rest), taken greedily within a file-count and byte
budget, and large code files are reduced to their structural skeleton.

Examples:
    codedoc extract .
    codedoc extract ~/src/project --max-total-bytes 200000 --stats
    codedoc survey . --max-depth 2 --format md
    codedoc prompt https://github.com/user/repo.git --specific "Focus on the API"
"#
)]
pub struct Cli {
    /// Output format for structured results (json/md).
    #[arg(
        long,
        global = true,
        default_value = "json",
        value_name = "FORMAT",
        value_parser = ["json", "md", "markdown"],
        long_help = "Select the output format for structured results (survey, toc, url,\n\
doctor).\n\n\
Supported values:\n\
- json (default)\n\
- md (markdown)\n\n\
The extract, structure and prompt commands always print plain text."
    )]
    pub format: String,

    /// Quiet mode (errors only on stderr).
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        long_help = "Only log errors to stderr. Results are still printed to stdout.\n\n\
RUST_LOG, when set, takes precedence."
    )]
    pub quiet: bool,

    /// Verbose mode (debug logging).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log debug diagnostics to stderr, including every selection and\n\
condensing decision. RUST_LOG, when set, takes precedence."
    )]
    pub verbose: bool,

    /// Pretty-print JSON output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON output with indentation for human readability.\n\n\
Has no effect on md output."
    )]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Selection budget shared by extract and prompt.
#[derive(Args, Debug, Clone, Copy)]
pub struct BudgetArgs {
    /// Maximum number of files to include.
    #[arg(
        long,
        env = "CODEDOC_MAX_FILES",
        default_value_t = DEFAULT_MAX_FILES,
        value_name = "N",
        long_help = "Maximum number of files included in the document.\n\n\
Files are taken in priority order; once N files are included selection stops."
    )]
    pub max_files: usize,

    /// Maximum sum of on-disk file sizes to include.
    #[arg(
        long,
        env = "CODEDOC_MAX_TOTAL_BYTES",
        default_value_t = DEFAULT_MAX_TOTAL_BYTES,
        value_name = "BYTES",
        long_help = "Upper bound on the sum of on-disk sizes of included files.\n\n\
A file that would exceed the remaining budget is skipped and selection\n\
continues with smaller files further down the ranking."
    )]
    pub max_total_bytes: u64,

    /// Per-file size cap.
    #[arg(
        long,
        env = "CODEDOC_MAX_FILE_BYTES",
        default_value_t = DEFAULT_MAX_FILE_BYTES,
        value_name = "BYTES",
        long_help = "Files larger than this are never considered, and at most this many\n\
bytes are read from any selected file."
    )]
    pub max_file_bytes: u64,
}

impl From<BudgetArgs> for ExtractOptions {
    fn from(args: BudgetArgs) -> Self {
        ExtractOptions {
            max_files: args.max_files,
            max_total_bytes: args.max_total_bytes,
            max_file_bytes: args.max_file_bytes,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract prioritized, condensed repository content as Markdown.
    #[command(
        long_about = "Survey PATH, rank its files, select them within the budget and print\n\
the combined Markdown document to stdout.\n\n\
Examples:\n\
  codedoc extract .\n\
  codedoc extract ../project --max-files 20 --stats\n"
    )]
    Extract {
        /// Repository root.
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[command(flatten)]
        budget: BudgetArgs,

        /// Show extraction statistics on stderr.
        #[arg(
            long,
            long_help = "Print file count, byte total and a token estimate to stderr."
        )]
        stats: bool,

        /// Token encoding for statistics (cl100k/o200k/heuristic).
        #[arg(
            long,
            default_value = "cl100k",
            value_name = "MODEL",
            long_help = "Encoding used for the token estimate printed with --stats.\n\n\
Supported values:\n\
- cl100k (default)\n\
- o200k\n\
- heuristic: fast estimate without loading an encoding"
        )]
        token_model: TokenModel,
    },

    /// Summarize the files and directories of a tree.
    #[command(
        long_about = "List every file and directory under PATH down to --max-depth, skipping\n\
excluded directories such as .git and node_modules. Lists are sorted.\n\n\
Example:\n\
  codedoc survey . --max-depth 2 --format md\n"
    )]
    Survey {
        /// Directory to survey.
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Deepest level to report (1 = direct children).
        #[arg(long, default_value_t = DEFAULT_SURVEY_DEPTH, value_name = "N")]
        max_depth: usize,
    },

    /// Print the structural skeleton of one code file.
    #[command(
        long_about = "Run the structural extractor over FILE. Small files are printed\n\
unchanged; large ones are reduced to imports and declarations.\n\n\
Example:\n\
  codedoc structure src/main.rs\n"
    )]
    Structure {
        /// File to condense.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the heading outline of a Markdown document.
    #[command(
        long_about = "Collect the ATX headings (# to ######) of FILE in document order.\n\n\
Example:\n\
  codedoc toc docs/generated.md --format md\n"
    )]
    Toc {
        /// Markdown file.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Normalize or validate repository URLs.
    #[command(
        long_about = "Repository URL helpers. SSH remotes (git@host:path, ssh://git@host/path)\n\
are understood and converted to HTTPS where needed."
    )]
    Url {
        #[command(subcommand)]
        action: UrlCommands,
    },

    /// Build the full documentation prompt for a repository.
    #[command(
        long_about = r#"Build the documentation prompt for SOURCE and print it to stdout.

SOURCE is a local directory or a repository URL. URLs are shallow-cloned
(git clone --depth 1) into a temporary directory that is removed afterwards.

Examples:
    codedoc prompt .
    codedoc prompt https://github.com/user/repo.git --specific "Document the CLI"
    codedoc prompt git@github.com:user/repo.git --generic-file prompts/generic.txt
"#
    )]
    Prompt {
        /// Local directory or repository URL.
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Repository name used in the prompt.
        #[arg(
            long,
            value_name = "NAME",
            long_help = "Repository name used in the prompt. Defaults to the directory name or\n\
the last segment of the URL."
        )]
        name: Option<String>,

        /// Repository-specific instructions.
        #[arg(long, value_name = "TEXT")]
        specific: Option<String>,

        /// File holding generic instructions to use instead of the built-in ones.
        #[arg(long, value_name = "FILE")]
        generic_file: Option<PathBuf>,

        #[command(flatten)]
        budget: BudgetArgs,

        /// Show prompt statistics on stderr.
        #[arg(long)]
        stats: bool,

        /// Token encoding for statistics (cl100k/o200k/heuristic).
        #[arg(
            long,
            default_value = "cl100k",
            value_name = "MODEL",
            long_help = "Encoding used for the token estimate printed with --stats.\n\n\
Supported values:\n\
- cl100k (default)\n\
- o200k\n\
- heuristic: fast estimate without loading an encoding"
        )]
        token_model: TokenModel,
    },

    /// Check external dependencies.
    #[command(
        long_about = "Check whether git is installed and whether the tiktoken encodings used\n\
for token estimates can be loaded.\n\n\
Example:\n\
  codedoc doctor\n"
    )]
    Doctor,
}

#[derive(Subcommand, Debug)]
pub enum UrlCommands {
    /// Print the canonical form of a repository URL.
    #[command(
        long_about = "Map SSH and HTTP remotes to HTTPS, enforce a .git suffix and lowercase\n\
the result. Two URLs for the same repository normalize to the same string.\n\n\
Example:\n\
  codedoc url normalize git@github.com:User/Repo\n"
    )]
    Normalize {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Check that a remote repository is reachable (git ls-remote).
    #[command(
        long_about = "Run git ls-remote against URL without cloning. SSH URLs are tried via\n\
HTTPS first. Failures are classified (ssh_auth, ssh_host_key, not_found,\n\
network, unknown) and the command exits non-zero.\n\n\
Example:\n\
  codedoc url validate https://github.com/user/repo.git\n"
    )]
    Validate {
        #[arg(value_name = "URL")]
        url: String,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    match cli.command {
        Commands::Extract {
            path,
            budget,
            stats,
            token_model,
        } => crate::flows::content::run_extract(&path, budget.into(), stats, token_model),

        Commands::Survey { path, max_depth } => {
            crate::backends::survey::run_survey(&path, max_depth, render_config)
        }

        Commands::Structure { file } => crate::backends::structure::run_structure(&file),

        Commands::Toc { file } => crate::flows::toc::run_toc(&file, render_config),

        Commands::Url { action } => match action {
            UrlCommands::Normalize { url } => {
                crate::backends::git::run_url_normalize(&url, render_config)
            }
            UrlCommands::Validate { url } => {
                crate::backends::git::run_url_validate(&url, render_config)
            }
        },

        Commands::Prompt {
            source,
            name,
            specific,
            generic_file,
            budget,
            stats,
            token_model,
        } => {
            let generic_prompt = match generic_file {
                Some(path) => Some(
                    fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read generic prompt: {:?}", path))?,
                ),
                None => None,
            };
            let request = PromptRequest {
                repo_name: name,
                generic_prompt,
                specific_prompt: specific,
                options: budget.into(),
                token_model,
            };
            crate::flows::prompt::run_prompt(&source, request, stats)
        }

        Commands::Doctor => crate::backends::doctor::run_doctor(render_config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_budget_defaults() {
        let cli = Cli::try_parse_from(["codedoc", "extract", "."]).unwrap();
        match cli.command {
            Commands::Extract { budget, .. } => {
                let opts: ExtractOptions = budget.into();
                assert_eq!(opts.max_files, DEFAULT_MAX_FILES);
                assert_eq!(opts.max_total_bytes, DEFAULT_MAX_TOTAL_BYTES);
                assert_eq!(opts.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_prompt_arguments() {
        let cli = Cli::try_parse_from([
            "codedoc",
            "prompt",
            "git@github.com:user/repo.git",
            "--name",
            "repo",
            "--specific",
            "Focus on setup",
            "--max-files",
            "5",
            "--format",
            "md",
        ])
        .unwrap();
        assert_eq!(cli.format, "md");
        match cli.command {
            Commands::Prompt {
                source,
                name,
                specific,
                budget,
                ..
            } => {
                assert_eq!(source, "git@github.com:user/repo.git");
                assert_eq!(name.as_deref(), Some("repo"));
                assert_eq!(specific.as_deref(), Some("Focus on setup"));
                assert_eq!(budget.max_files, 5);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["codedoc", "--format", "xml", "doctor"]).is_err());
    }
}
