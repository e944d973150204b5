use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
#[cfg(windows)]
const HISTORY_PATH: &str = "%TEMP%.minitri_history";
#[cfg(unix)]
const HISTORY_PATH: &str = "/tmp/.minitri_history";

#[derive(Debug, Parser)]
#[command(about = "Mini Triangle compiler and stack machine", long_about = None, color = clap::ColorChoice::Always)]
pub struct Cli {
    #[arg(short='H', long, default_value_t = String::from(HISTORY_PATH))]
    pub history_path: String,
    #[arg(short, long, default_value_t = EditMode::Vi)]
    pub editor_mode: EditMode,
    /// Raise log verbosity, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compile a source file and execute it
    Run(RunArgs),
    /// Compile a source file to bytecode
    Build {
        #[arg(value_hint = ValueHint::FilePath)]
        file: String,
        /// Defaults to the source path with an `.mtc` extension
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<String>,
        #[arg(short, long, default_value_t = false)]
        listing: bool,
    },
    /// Execute a bytecode file written by `build`
    Exec {
        #[arg(value_hint = ValueHint::FilePath)]
        file: String,
        #[arg(short, long, default_value_t = false)]
        listing: bool,
    },
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: String,
    /// Print the generated instructions to stderr
    #[arg(short, long, default_value_t = false)]
    pub listing: bool,
    #[arg(long, default_value_t = false)]
    pub debug_ast: bool,
    #[arg(long, default_value_t = false)]
    pub debug_tokens: bool,
    /// Abort after this many executed instructions
    #[arg(long)]
    pub step_limit: Option<usize>,
}

#[derive(Debug, ValueEnum, Clone, Copy)]
pub enum EditMode {
    Vi,
    Emacs,
}

impl std::fmt::Display for EditMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vi => write!(f, "vi"),
            Self::Emacs => write!(f, "emacs"),
        }
    }
}

impl From<EditMode> for rustyline::config::EditMode {
    fn from(mode: EditMode) -> Self {
        match mode {
            EditMode::Vi => rustyline::config::EditMode::Vi,
            EditMode::Emacs => rustyline::config::EditMode::Emacs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from(["minitri", "-vv", "run", "a.mt", "--listing", "--step-limit", "50"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        let Some(Command::Run(args)) = cli.command else {
            panic!("expected run, got {:?}", cli.command);
        };
        assert_eq!(args.file, "a.mt");
        assert!(args.listing);
        assert!(!args.debug_ast);
        assert_eq!(args.step_limit, Some(50));
    }

    #[test]
    fn test_build_output() {
        let cli = Cli::try_parse_from(["minitri", "build", "a.mt", "-o", "out.mtc"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Build { output: Some(ref out), .. }) if out == "out.mtc"
        ));
    }

    #[test]
    fn test_no_subcommand_is_repl() {
        let cli = Cli::try_parse_from(["minitri", "-e", "emacs"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(cli.editor_mode, EditMode::Emacs));
    }
}
