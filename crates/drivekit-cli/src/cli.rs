use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    /// Set proxy
    #[arg(required = false, long, short = 'P', global = true)]
    pub proxy: Option<String>,

    /// Set user agent
    #[arg(required = false, long, short = 'A', global = true)]
    pub user_agent: Option<String>,

    /// Access token, overriding the config file and environment
    #[arg(required = false, long, global = true)]
    pub token: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the configuration file to stdout
    Config {
        /// Open the configuration file in editor
        /// Optional value can be passed to set as editor (default is $EDITOR)
        #[arg(required = false, short, long)]
        edit: Option<Option<String>>,
    },

    /// Show account information and storage quota
    About {
        /// About fields to request (repeatable)
        #[arg(required = false, short, long = "field")]
        fields: Vec<String>,
    },

    /// Show a file's metadata
    #[command(arg_required_else_help = true)]
    Get {
        /// File id
        #[arg(required = true)]
        id: String,
    },

    /// Print the folder path leading to a file
    #[command(arg_required_else_help = true)]
    Path {
        /// File id
        #[arg(required = true)]
        id: String,
    },

    /// List files in a folder
    #[clap(name = "list", visible_alias = "ls")]
    List {
        /// Parent folder id (default: root folder)
        #[arg(required = false)]
        parent: Option<String>,

        /// Fetch every page instead of the first one
        #[arg(required = false, short, long)]
        all: bool,

        /// Number of files per page
        #[arg(required = false, long)]
        page_size: Option<u32>,
    },

    /// Search files with a combination of filters
    #[clap(name = "search", visible_alias = "s")]
    Search {
        /// Exact file name
        #[arg(required = false, long)]
        name: Option<String>,

        /// Exclude files with this exact name
        #[arg(required = false, long)]
        not_name: Option<String>,

        /// Exact MIME type
        #[arg(required = false, long)]
        mime_type: Option<String>,

        /// Text in the file content or metadata
        #[arg(required = false, long)]
        text: Option<String>,

        /// Only starred files
        #[arg(required = false, long)]
        starred: bool,

        /// Restrict the search to a folder
        #[arg(required = false, long)]
        parent: Option<String>,

        /// Leave out trashed files
        #[arg(required = false, long)]
        exclude_trashed: bool,

        /// Match any filter instead of all of them
        #[arg(required = false, long)]
        any: bool,
    },

    /// Find a single file by exact name
    #[command(arg_required_else_help = true)]
    Find {
        /// File name
        #[arg(required = true)]
        name: String,

        /// Only match folders
        #[arg(required = false, long)]
        folder: bool,

        /// Include trashed files
        #[arg(required = false, long)]
        trashed: bool,
    },

    /// Download a file's content
    #[command(arg_required_else_help = true)]
    #[clap(name = "download", visible_alias = "dl")]
    Download {
        /// File id
        #[arg(required = true)]
        id: String,

        /// Output file or directory
        #[arg(required = false, short, long, value_hint = ValueHint::AnyPath)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(required = false, short, long)]
        force: bool,
    },
}
