use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "rollout")]
#[command(version)]
#[command(about = "Provision third-party software on managed endpoints", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Catalog file to use instead of the default
    #[arg(short, long, global = true, value_name = "PATH")]
    pub catalog: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install one package from the catalog
    Install(PackageArgs),

    /// Install several packages, in the order given
    BulkInstall(BulkInstallArgs),

    /// Remove one package
    Uninstall(PackageArgs),

    /// Open the diagnostic console for one package
    Test(PackageArgs),

    /// List catalog packages with their installed state
    List,

    /// Show catalog, share, and platform tool status
    Status,

    /// Manage the connection to the deployment share
    #[command(subcommand)]
    Share(ShareCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct PackageArgs {
    /// Package name exactly as it appears in the catalog
    pub name: String,
}

#[derive(Parser)]
pub struct BulkInstallArgs {
    /// Package names in installation order
    #[arg(required = true)]
    pub names: Vec<String>,
}

// ============================================================================
// Share Commands
// ============================================================================

#[derive(Subcommand)]
pub enum ShareCommand {
    /// Connect the share with prompted credentials
    Connect {
        /// Share root to connect, defaults to the catalog's share base
        #[arg(long)]
        root: Option<String>,
    },

    /// Drop cached credentials and mapped connections
    Disconnect {
        /// Share root to disconnect, defaults to the catalog's share base
        #[arg(long)]
        root: Option<String>,
    },
}
