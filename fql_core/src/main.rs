use fql_core::logging::{self, codes};
use fql_core::{log_error, log_success};
use fql_core::{parse_with_options, to_text, ParseOptions};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize global logging system
    logging::init_global_logging()?;

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query> [options]", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return Ok(());
    }

    let query = &args[1];
    let options = parse_cli_options(&args[2..]);

    let parse_options = ParseOptions {
        lenient: options.lenient,
        partial: options.partial,
    };

    match parse_with_options(query, parse_options) {
        Ok(output) => {
            log_success!(codes::success::PARSE_COMPLETE, "query parsed",
                "chars" => query.chars().count()
            );

            if let Some(err) = &output.error {
                eprintln!("Syntax error (recovered): {}", err.message);
            }

            if let Some(root) = &output.root {
                println!("{}", to_text(root));
                if options.json {
                    println!("{}", serde_json::to_string_pretty(root)?);
                }
            } else {
                println!();
            }

            if options.chars {
                for tagged in &output.tagged_chars {
                    println!(
                        "{:>4}  {}  {}",
                        tagged.char.position.offset, tagged.char.value, tagged.class
                    );
                }
            }
        }
        Err(err) => {
            log_error!(codes::parser::SYNTAX_ERROR, &err.message, "errno" => err.errno);
            eprintln!("Syntax error: {}", err.message);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_help(program_name: &str) {
    println!("FQL Parser v{}", env!("CARGO_PKG_VERSION"));
    println!("Parses filter queries and prints the canonical form");
    println!();
    println!("USAGE:");
    println!("    {} <query> [options]", program_name);
    println!();
    println!("ARGUMENTS:");
    println!("    <query>    Filter query text, e.g. \"status=200 and path=~^/api\"");
    println!();
    println!("OPTIONS:");
    println!("    --help       Show this help message");
    println!("    --json       Also print the parsed tree as JSON");
    println!("    --chars      Print each character with its semantic class");
    println!("    --partial    Accept incomplete queries (editor mode)");
    println!("    --lenient    Report syntax errors but keep the partial tree");
    println!();
    println!("EXAMPLES:");
    println!("    {} \"status=200\"", program_name);
    println!("    {} \"a=1 and (b=2 or c=3)\" --json", program_name);
    println!("    {} \"labels:app=web\" --chars", program_name);
}

#[derive(Debug, Default)]
struct CliOptions {
    json: bool,
    chars: bool,
    partial: bool,
    lenient: bool,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions::default();

    for arg in args {
        match arg.as_str() {
            "--json" => options.json = true,
            "--chars" => options.chars = true,
            "--partial" => options.partial = true,
            "--lenient" => options.lenient = true,
            _ => {
                eprintln!("Warning: Unknown option '{}'", arg);
            }
        }
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_options() {
        let args = vec![
            "--json".to_string(),
            "--partial".to_string(),
            "--unknown".to_string(),
        ];

        let options = parse_cli_options(&args);
        assert!(options.json);
        assert!(options.partial);
        assert!(!options.chars);
        assert!(!options.lenient);
    }
}
