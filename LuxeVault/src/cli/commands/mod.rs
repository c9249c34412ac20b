use clap::Subcommand;
use std::path::PathBuf;

pub mod execute;
pub mod inspect;
pub mod inventory;
pub mod session;
pub mod upload;

#[derive(Subcommand)]
pub enum Commands {
    /// List the assets in the live collection
    List {
        /// Only print the number of assets
        #[arg(short, long)]
        count: bool,
    },

    /// Upload a model and thumbnail and add them to the collection
    Upload {
        /// Asset title
        #[arg(short, long)]
        name: String,

        /// Binary glTF model (.glb)
        #[arg(short, long)]
        model: PathBuf,

        /// Thumbnail image
        #[arg(short, long)]
        thumbnail: PathBuf,

        /// Suppress step output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Remove an asset record by key (no confirmation)
    Purge {
        /// Store key of the record
        key: String,
    },

    /// Open an admin session
    Login {
        /// Admin identifier
        #[arg(short, long)]
        identifier: String,

        /// Admin passcode
        #[arg(short, long)]
        passcode: String,
    },

    /// Close the admin session
    Logout,

    /// Show session state and active configuration
    Status {
        /// Write the active configuration to the config file
        #[arg(long)]
        save_config: bool,
    },

    /// Report how a local model would be normalized
    Inspect {
        /// GLB or glTF file
        file: PathBuf,

        /// Override the target length of the largest extent
        #[arg(long)]
        target_size: Option<f32>,
    },
}
