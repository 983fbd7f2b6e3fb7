use std::{env, path::PathBuf, process};

use study_wizard::{
    cli::{self, context::policy_from},
    generator::{self, render_document, write_markup},
    init, utils, WizardError,
};
use wizard_config::ConfigManager;

const USAGE: &str = "\
Usage:
  study_wizard generate <form.json> [output.html]
  study_wizard check <form.json>
  study_wizard run <form.json>";

fn main() {
    init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [command, form] if command == "generate" => generate(form, None)?,
        [command, form, output] if command == "generate" => generate(form, Some(output))?,
        [command, form] if command == "check" => check(form)?,
        [command, form] if command == "run" => cli::run_shell(&PathBuf::from(form))?,
        _ => {
            println!("{USAGE}");
        }
    }
    Ok(())
}

fn generate(form: &str, output: Option<&String>) -> Result<(), WizardError> {
    let config = ConfigManager::with_base_dir(utils::resolve_home())?.load()?;
    let document = generator::load_form(&PathBuf::from(form))?;
    if document.pages.is_empty() {
        return Err(WizardError::EmptyForm);
    }

    let output = output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.default_output_file));
    let markup = render_document(&document, &policy_from(&config));
    write_markup(&markup, &output)?;

    println!(
        "Generated {} pages with {} total questions.",
        markup.pages, markup.questions
    );
    if !markup.skipped.is_empty() {
        println!("Skipped unsupported questions: {}", markup.skipped.join(", "));
    }
    println!("Markup written to {}", output.display());
    Ok(())
}

fn check(form: &str) -> Result<(), WizardError> {
    let document = generator::load_form(&PathBuf::from(form))?;
    let warnings = document.warnings();
    if warnings.is_empty() {
        println!("No issues found.");
    } else {
        for warning in warnings {
            println!("warning: {warning}");
        }
    }
    Ok(())
}
