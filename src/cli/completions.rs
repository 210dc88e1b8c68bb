use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    qdep completions bash > ~/.bash_completion.d/qdep\n\n\
                  Generate zsh completions:\n    qdep completions zsh > ~/.zfunc/_qdep\n\n\
                  Generate fish completions:\n    qdep completions fish > ~/.config/fish/completions/qdep.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
