use anyhow::{bail, Context};
use millkit::{init_logging, Diagnostics, Project, BUILD_DATE, VERSION};
use std::fs;
use std::path::PathBuf;

fn usage() -> ! {
    eprintln!("millkit {VERSION} ({BUILD_DATE})");
    eprintln!("Usage: millkit <project.json> [output.gcode]");
    eprintln!();
    eprintln!("Compiles every enabled operation of the project into one");
    eprintln!("G-code program. Without an output file the program goes");
    eprintln!("to stdout.");
    std::process::exit(2);
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let mut args = std::env::args().skip(1);
    let project_path = match args.next() {
        Some(a) if a == "-h" || a == "--help" => usage(),
        Some(a) if a == "-V" || a == "--version" => {
            println!("millkit {VERSION} ({BUILD_DATE})");
            return Ok(());
        }
        Some(a) => PathBuf::from(a),
        None => usage(),
    };
    let output_path = args.next().map(PathBuf::from);
    if args.next().is_some() {
        usage();
    }

    let project = Project::load(&project_path)
        .with_context(|| format!("failed to load project {}", project_path.display()))?;
    if !project.operations.is_empty() && project.operations.iter().all(|op| !op.enabled) {
        bail!("project '{}' has no enabled operations", project.name);
    }

    let mut diag = Diagnostics::new();
    let gcode = project
        .compile(&mut diag)
        .with_context(|| format!("failed to compile project '{}'", project.name))?;
    for warning in diag.warnings() {
        eprintln!("warning: {warning}");
    }

    match output_path {
        Some(path) => {
            fs::write(&path, &gcode)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "wrote {} lines to {}",
                gcode.lines().count(),
                path.display()
            );
        }
        None => print!("{gcode}"),
    }
    Ok(())
}
