use clap::{Parser, Subcommand};

/// Avidia - Android virtual device manager
#[derive(Parser, Debug)]
#[command(name = "avidia")]
#[command(about = "A terminal front-end for creating and running Android virtual devices")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the interactive interface (the default)
    Tui,
    /// List existing virtual devices
    List,
    /// Create a virtual device, starting the interactive wizard with NAME filled in
    Create {
        /// Name of the new virtual device
        name: String,
    },
    /// Start a virtual device in this terminal
    Start {
        /// Virtual device to boot
        name: String,
    },
    /// Stop a running virtual device
    Stop {
        /// Virtual device to stop
        name: String,
    },
    /// Delete a virtual device and its data
    Delete {
        /// Virtual device to delete
        name: String,
        /// Skip the confirmation question
        #[arg(short, long)]
        yes: bool,
    },
    /// Install a system image using the interactive wizard
    Install,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
