use clap::Parser;
use miette::Result;
use themeconv::cli::{Cli, Commands};
use themeconv::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Convert(args) => {
            themeconv::cli::convert::run(args, &printer)?;
        }
        Commands::Compile(args) => themeconv::cli::compile::run(args, &printer)?,
        Commands::Validate(args) => {
            themeconv::cli::validate::run(args, &printer)?;
        }
        Commands::Completions(args) => themeconv::cli::completions::run(args)?,
    }

    Ok(())
}
