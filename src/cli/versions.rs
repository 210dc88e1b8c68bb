use clap::Parser;

/// Arguments for versions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List all tags:\n    qdep versions acme/widgets\n\n\
                  List branches and tags:\n    qdep versions --branches acme/widgets\n\n\
                  Newest three tags on one line:\n    qdep versions --short --limit 3 acme/widgets")]
pub struct VersionsArgs {
    /// Package to list the versions of, without a version or subpath
    pub package: String,

    /// Include branches in the output
    #[arg(long, short = 'b')]
    pub branches: bool,

    /// Exclude tags from the output
    #[arg(long)]
    pub no_tags: bool,

    /// Print everything on a single line, without headers
    #[arg(long, short = 's')]
    pub short: bool,

    /// Keep only the LIMIT newest entries of each kind
    #[arg(long)]
    pub limit: Option<usize>,
}
