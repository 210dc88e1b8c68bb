use clap::Parser;

/// Arguments for pkgresolve command
#[derive(Parser, Debug)]
pub struct PkgresolveArgs {
    /// Package descriptor to resolve
    pub package: String,

    /// Version cached earlier, used when the descriptor pins none
    #[arg(value_name = "LATEST_VERSION")]
    pub version: Option<String>,

    /// Do not update existing branch checkouts
    #[arg(long)]
    pub no_pull: bool,

    /// Do not download packages that are not cached yet
    #[arg(long)]
    pub no_clone: bool,

    /// Treat the package as a project dependency (.pro) instead of an include (.pri)
    #[arg(long)]
    pub project: bool,
}
