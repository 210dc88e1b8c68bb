use clap::Parser;

/// Arguments for query command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show details about a package:\n    qdep query acme/widgets@1.2.0\n\n\
                  Only print the expanded name:\n    qdep query --expand acme/widgets\n\n\
                  Skip the existence check:\n    qdep query --no-check acme/widgets@master")]
pub struct QueryArgs {
    /// Package descriptor to query
    pub package: String,

    /// Only print the expanded package name
    #[arg(long)]
    pub expand: bool,

    /// Do not check whether the package version exists
    #[arg(long)]
    pub no_check: bool,

    /// Also list all tags and branches of the package
    #[arg(long)]
    pub versions: bool,
}
