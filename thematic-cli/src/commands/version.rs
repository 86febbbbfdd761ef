//! Version command - show version information.

use anyhow::Result;
use thematic_client::Artifact;

/// Version information.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the version command.
pub fn run() -> Result<()> {
    println!("thematic - command line client for the Thematic API");
    println!();
    println!("Version:     {}", VERSION);
    println!(
        "Platform:    {} / {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    println!();
    println!("Artifacts:");
    for artifact in Artifact::ALL {
        println!("  {}", artifact);
    }

    Ok(())
}
