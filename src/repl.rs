use crate::cli::Cli;
use crate::compiler::Compiler;
use crate::vm::Machine;
use anyhow::Result;
use crossterm::style::Stylize;
use rustyline::config::Configurer;
use rustyline::highlight::MatchingBracketHighlighter;
use rustyline::validate::MatchingBracketValidator;
use rustyline::{Cmd, Editor, EventHandler, KeyCode, KeyEvent, Modifiers};
use rustyline::{Completer, Helper, Highlighter, Hinter, Validator};
const HELP: &str = r#"
Enter a whole program, e.g. `let var x: Integer; in begin getint(x); putint(x * x); end`.
Input continues on the next line until every `begin` has its `end`.

commands
:q|e|exit|quit - quit
:help          - show this help message
:clear         - clear the terminal screen
:listing       - toggle printing the generated instructions
:ast           - toggle printing the syntax tree
"#;
struct ShouldRunIfBlockIsClosed;

impl rustyline::ConditionalEventHandler for ShouldRunIfBlockIsClosed {
    fn handle(
        &self,
        _: &rustyline::Event,
        _: rustyline::RepeatCount,
        _: bool,
        ctx: &rustyline::EventContext,
    ) -> Option<Cmd> {
        if is_open(ctx.line()) {
            Some(Cmd::Newline)
        } else {
            Some(Cmd::AcceptLine)
        }
    }
}

/// True while a `begin` or `(` is still waiting for its partner, or the
/// code so far stops right after `in`.
fn is_open(input: &str) -> bool {
    let mut blocks: i32 = 0;
    let mut parens: i32 = 0;
    let mut last_word = None;
    for line in input.lines() {
        let code = line.split('!').next().unwrap_or_default();
        if let Some(word) = code.split_whitespace().last() {
            last_word = Some(word);
        }
        for c in code.chars() {
            match c {
                '(' => parens += 1,
                ')' => parens -= 1,
                _ => {}
            }
        }
        for word in code.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
            match word {
                "begin" => blocks += 1,
                "end" => blocks -= 1,
                _ => {}
            }
        }
    }
    blocks > 0 || parens > 0 || last_word == Some("in")
}

enum ReplCommand {
    Exit,
    Help,
    Clear,
    Listing,
    Ast,
    Error(String),
}

#[derive(Completer, Helper, Highlighter, Hinter, Validator)]
struct InputValidator {
    #[rustyline(Validator)]
    brackets: MatchingBracketValidator,
    #[rustyline(Highlighter)]
    highlighter: MatchingBracketHighlighter,
}

pub fn run(args: Cli) -> Result<()> {
    let h = InputValidator {
        brackets: MatchingBracketValidator::new(),
        highlighter: MatchingBracketHighlighter::new(),
    };
    let mut rl = Editor::new()?;
    rl.set_edit_mode(args.editor_mode.into());
    rl.set_helper(Some(h));
    rl.bind_sequence(
        KeyEvent(KeyCode::Char('c'), Modifiers::CTRL),
        EventHandler::Simple(Cmd::Interrupt),
    );
    rl.bind_sequence(
        KeyEvent(KeyCode::Enter, Modifiers::NONE),
        EventHandler::Conditional(Box::new(ShouldRunIfBlockIsClosed)),
    );
    if rl.load_history(&args.history_path).is_err() {
        println!("No previous history.");
    }

    let mut compiler = Compiler::default();

    loop {
        let input = match rl.readline("> ") {
            Ok(input) => input,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        if input.trim().is_empty() {
            continue;
        }

        rl.add_history_entry(input.as_str())?;
        if let Some(command) = parse_input(&input) {
            match command {
                ReplCommand::Exit => break,
                ReplCommand::Help => println!("{HELP}"),
                ReplCommand::Clear => rl.clear_screen()?,
                ReplCommand::Listing => {
                    let on = !compiler.options().listing;
                    compiler = compiler.listing(on);
                    println!("listing {}", if on { "on" } else { "off" });
                }
                ReplCommand::Ast => {
                    let on = !compiler.options().debug_ast;
                    compiler = compiler.debug_ast(on);
                    println!("ast {}", if on { "on" } else { "off" });
                }
                ReplCommand::Error(message) => println!("{message}"),
            }
            continue;
        }

        let chunk = match compiler.compile(&input) {
            Ok(chunk) => chunk,
            Err(error) => {
                error.report("repl", &input)?;
                continue;
            }
        };
        let mut machine = Machine::new(chunk, std::io::stdin().lock(), std::io::stdout());
        match machine.run() {
            Ok(Some(value)) => eprintln!(":{value}"),
            Ok(None) => {}
            Err(error) => error.report("repl", &input)?,
        }
    }
    if rl.append_history(&args.history_path).is_err() {
        std::fs::write(&args.history_path, "")?;
        rl.save_history(&args.history_path)?;
    }
    Ok(())
}

fn parse_input(input: &str) -> Option<ReplCommand> {
    if !input.starts_with(':') {
        return None;
    }

    match input.trim() {
        ":q" | ":e" | ":exit" | ":quit" => Some(ReplCommand::Exit),
        ":help" => Some(ReplCommand::Help),
        ":clear" => Some(ReplCommand::Clear),
        ":listing" => Some(ReplCommand::Listing),
        ":ast" => Some(ReplCommand::Ast),
        _ => Some(ReplCommand::Error(format!(
            "Invalid command: {}",
            input.red()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_blocks_wait_for_more_input() {
        assert!(is_open("let var x: Integer; in begin"));
        assert!(is_open("let var x: Integer; in"));
        assert!(is_open("let var x: Integer; in putint(1"));
        assert!(!is_open("let var x: Integer; in begin x := 1; end"));
        assert!(!is_open("let var x: Integer; in x := 1; ! begin"));
        assert!(!is_open("let var ending: Integer; in ending := 1;"));
    }

    #[test]
    fn test_nested_blocks_and_trailing_in() {
        let nested = "let var x: Integer; in begin\n  while x < 3 do begin\n    x := x + 1;\n  end\n";
        assert!(is_open(nested));
        assert!(!is_open(&format!("{nested}end")));
        assert!(is_open("let var x: Integer;\nin\n"));
        assert!(is_open("let const n ~ 1; in ! trailing comment\n"));
        assert!(!is_open("let var x: Integer; in putint((1 + 2) * 3);"));
        assert!(is_open("let var x: Integer; in putint((1 + 2)"));
    }

    #[test]
    fn test_commands() {
        assert!(parse_input("let var x: Integer; in x := 1;").is_none());
        assert!(matches!(parse_input(":q"), Some(ReplCommand::Exit)));
        assert!(matches!(parse_input(":listing "), Some(ReplCommand::Listing)));
        assert!(matches!(parse_input(":nope"), Some(ReplCommand::Error(_))));
    }
}
