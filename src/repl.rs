use crate::environment::Environment;
use crate::evaluator::eval_program;
use crate::lexer::Lexer;
use crate::parser::Parser;
use anyhow::Result;
use std::io::{BufRead, Write};

const PROMPT: &str = ">> ";

/// Reads and evaluates one line at a time until `input` is exhausted. Bindings
/// made on one line stay visible on the following ones.
pub fn start<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<()> {
    let env = Environment::new().into_env();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;
        let mut line = String::new();
        let read = input.read_line(&mut line)?;
        if read == 0 {
            // EOF
            return Ok(());
        }
        let mut parser = Parser::new(Lexer::new(line.trim_end()));
        let program = parser.parse_program();
        if !parser.errors().is_empty() {
            print_parser_errors(&mut output, parser.errors())?;
            continue;
        }
        if program.statements.is_empty() {
            continue;
        }
        let evaluated = eval_program(&program, &env);
        writeln!(output, "{}", evaluated)?;
    }
}

fn print_parser_errors<W: Write>(output: &mut W, errors: &[String]) -> Result<()> {
    for msg in errors {
        writeln!(output, "\t{}", msg)?;
    }
    Ok(())
}
