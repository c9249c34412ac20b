//! `LuxeVault` command-line entry point

fn main() -> anyhow::Result<()> {
    luxevault::cli::run_cli()
}
