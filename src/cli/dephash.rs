use clap::Parser;

/// Arguments for dephash command
#[derive(Parser, Debug)]
pub struct DephashArgs {
    /// Packages to print identifiers for
    pub packages: Vec<String>,

    /// Treat packages as project dependencies (.pro) instead of includes (.pri)
    #[arg(long)]
    pub project: bool,

    /// Print "identifier;subpath" instead of the bare identifier
    #[arg(long)]
    pub pkgpath: bool,
}
