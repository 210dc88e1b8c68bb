use clap::Parser;

/// Arguments for update command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Check pinned packages for newer tags:\n    qdep update acme/widgets@1.0.0 acme/gadgets@2.1.0\n\n\
                  Print the complete updated dependency list:\n    qdep update --all acme/widgets@1.0.0 acme/gadgets@master")]
pub struct UpdateArgs {
    /// Package descriptors to check
    #[arg(required = true)]
    pub packages: Vec<String>,

    /// Print the full dependency list with updates applied
    #[arg(long)]
    pub all: bool,
}
