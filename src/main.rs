// pseudonorm: normalizing parser for a small pseudocode language

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use pseudonorm::ui::App;
use pseudonorm::{normalize_with, tokenize, ParserConfig, SeparatorPolicy, TraceMode};

/// Parse a pseudocode program and print it in canonical form.
#[derive(ClapParser, Debug)]
#[command(name = "pseudonorm", version, about)]
struct Cli {
    /// Pseudocode source file
    file: PathBuf,

    /// Print the normalized program to stdout instead of opening the viewer
    #[arg(long)]
    print: bool,

    /// Dump the token stream and exit
    #[arg(long)]
    tokens: bool,

    /// Require commas between list elements, parameters and arguments
    #[arg(long)]
    strict: bool,

    /// Record the grammar rules entered while parsing
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", cli.file.display(), e);
            process::exit(1);
        }
    };

    if cli.tokens {
        match tokenize(&source) {
            Ok(tokens) => {
                for token in tokens {
                    println!(
                        "{} {} @{}:{}",
                        token.kind.name(),
                        token.text,
                        token.location.line,
                        token.location.column
                    );
                }
                return Ok(());
            }
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
    }

    let config = ParserConfig {
        separators: if cli.strict {
            SeparatorPolicy::Strict
        } else {
            SeparatorPolicy::Lenient
        },
        trace: if cli.trace {
            TraceMode::Collect
        } else {
            TraceMode::Off
        },
    };

    let normalized = match normalize_with(&source, &config) {
        Ok(normalized) => normalized,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if cli.print {
        for event in &normalized.trace {
            eprintln!("{}", event);
        }
        print!("{}", normalized.output);
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(normalized, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
