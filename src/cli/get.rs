use clap::Parser;

/// Arguments for get command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Download the latest release:\n    qdep get acme/widgets\n\n\
                  Download several packages:\n    qdep get acme/widgets@1.2.0 acme/gadgets@master\n\n\
                  Download into a specific directory:\n    qdep get -d ./sources acme/widgets")]
pub struct GetArgs {
    /// Packages to download the sources of
    #[arg(required = true)]
    pub packages: Vec<String>,
}
