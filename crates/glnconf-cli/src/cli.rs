use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "GLN-CONF CLI - Frequencies of glutamine side-chain conformations relative to FMN, counted over the trajectory frames in which the monitored hydrogen bond is present.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    // --- Core Arguments ---
    /// Protein state to classify: 'dark' (Gln dihedral) or 'light' (Gln bond angle).
    #[arg(short, long, value_name = "STATE")]
    pub state: Option<String>,

    /// Trajectory base name(s). Each BASE is read from BASE.dcd; the topology is read
    /// from the first BASE.pdb. Several segments are concatenated in the order given.
    #[arg(short, long, value_name = "BASE", num_args = 1..)]
    pub trajectory: Vec<PathBuf>,

    /// H-bond index array (.npy or .csv), one row per copy: donor, hydrogen, acceptor, pre-acceptor.
    #[arg(short, long, value_name = "PATH")]
    pub indices: Option<PathBuf>,

    /// Gln descriptor index array (.npy or .csv): 4 columns for dark, 3 for light.
    #[arg(short, long = "gln-indices", value_name = "PATH")]
    pub gln_indices: Option<PathBuf>,

    /// Path to a TOML configuration file. Command-line values take precedence.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Output Control ---
    /// Label printed in front of every result line. Defaults to the first trajectory name.
    #[arg(long, value_name = "NAME")]
    pub label: Option<String>,

    /// Comma-separated labels for the tracked copies, in index-array row order.
    #[arg(long = "copy-labels", value_name = "LABELS", value_delimiter = ',')]
    pub copy_labels: Option<Vec<String>>,

    /// Number of decimal places in the printed percentages [default: 2].
    #[arg(long, value_name = "NUM")]
    pub precision: Option<usize>,

    // --- Logging & Performance ---
    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub threads: Option<usize>,
}
