use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use recalc::{CompileError, Config, Engine, LogBase, PowAssoc, Var};

/// Evaluates arithmetic formulas, either once from the command line or
/// interactively line by line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Evaluate this expression and exit.
    #[arg(short, long)]
    expr: Option<String>,

    /// Group chained `^` from the right.
    #[arg(long)]
    right_assoc: bool,

    /// Make `log` the natural logarithm.
    #[arg(long)]
    natural_log: bool,

    /// Print the compiled tree before the result.
    #[arg(long)]
    tree: bool,

    /// Bind a variable, as `name=value`. May be repeated.
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    vars: Vec<(String, f64)>,
}

fn parse_var(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("bad value for '{}': {e}", name.trim()))?;
    Ok((name.trim().to_string(), value))
}

fn report(line: &str, err: &CompileError) {
    println!("Error at position {}", err.offset());
    println!("{line}");
    println!("{:>width$}", "^", width = err.offset());
    log::debug!("{err}");
}

fn eval_line(engine: &Engine, line: &str, tree: bool) -> bool {
    match engine.compile(line) {
        Ok(expr) => {
            if tree {
                expr.print();
            }
            println!("{}", expr.eval());
            true
        }
        Err(err) => {
            report(line, &err);
            false
        }
    }
}

fn repl(engine: &Engine, tree: bool) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        stdout.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line == "q" || line == "quit" {
            break;
        }
        eval_line(engine, line, tree);
    }
    Ok(())
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let args = Args::parse();

    let config = Config {
        pow_assoc: if args.right_assoc { PowAssoc::Right } else { PowAssoc::Left },
        log_base: if args.natural_log { LogBase::Natural } else { LogBase::Ten },
        ..Config::default()
    };
    let mut engine = Engine::with_config(config);

    for (name, value) in &args.vars {
        if let Err(e) = engine.register_var(name, &Var::new(*value)) {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    }

    match args.expr {
        Some(expr) => {
            if eval_line(&engine, &expr, args.tree) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        None => match repl(&engine, args.tree) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
    }
}
