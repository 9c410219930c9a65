use clap::Parser;
use miette::Result;
use quartermaster::cli::{Cli, Commands};
use quartermaster::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Lint(args) => {
            let clean = quartermaster::cli::lint::run(args, &printer)?;
            if !clean {
                std::process::exit(1);
            }
        }
        Commands::Atlas(args) => quartermaster::cli::atlas::run(args, &printer)?,
        Commands::Locale(args) => quartermaster::cli::locale::run(args, &printer)?,
        Commands::Structure(args) => quartermaster::cli::structure::run(args, &printer)?,
        Commands::Gallery(args) => quartermaster::cli::gallery::run(args, &printer)?,
        Commands::Completions(args) => quartermaster::cli::completions::run(args)?,
    }

    Ok(())
}
