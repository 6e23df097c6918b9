// -- crate imports
use anyhow::{Context, Result};
use clap::Parser;
use desktop_entries::{
    DesktopFile, DesktopFilesLocation, DuplicatePolicy, LocatorConfig, Sections,
    UnlistablePolicy,
};
use tracing::{debug, info};

// -- module definitions
mod args;
mod log;
mod report;
mod scan;

// -- module imports
use crate::{
    args::{Args, Command},
    report::{Finding, Status},
};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.no_log {
        log::init_silent()?;
    } else {
        log::init_tracing()?;
        info!("desktop-entries started");
        debug!("Parsed args: {args:#?}");
    }

    match &args.command {
        Command::Dirs => {
            let location = locate(&args)?;
            print_paths(location.directories(), args.json)?;
        }
        Command::Files => {
            let location = locate(&args)?;
            let files = location.files().context("Could not list desktop files")?;
            print_paths(files, args.json)?;
        }
        Command::Show { files } => {
            let mut parsed = Vec::with_capacity(files.len());
            for path in files {
                let file = DesktopFile::new(path);
                let sections = file.entries()?.clone();
                parsed.push(Finding::parsed(file.path().to_path_buf(), sections));
            }
            print_findings(&parsed, args.json)?;
        }
        Command::Dump { jobs } => {
            let location = locate(&args)?;
            let files = location
                .files()
                .context("Could not list desktop files")?
                .to_vec();
            let findings =
                scan::parse_files_concurrently(files, jobs.unwrap_or_else(scan::default_jobs))
                    .await;
            print_findings(&findings, args.json)?;
        }
    }

    info!("desktop-entries done!");
    Ok(())
}

/// Builds the locator from the environment, overridden by command-line flags.
fn locate(args: &Args) -> Result<DesktopFilesLocation> {
    let mut config = match &args.home {
        Some(home) => LocatorConfig::with_env_data_dirs(home),
        None => LocatorConfig::from_env().context("Could not read locator config from env")?,
    };

    if !args.data_dirs.is_empty() {
        config.data_dirs = args.data_dirs.clone();
    }
    if args.strict_dirs {
        config.unlistable = UnlistablePolicy::Fail;
    }
    if args.first_wins {
        config.duplicates = DuplicatePolicy::FirstWins;
    }

    let location =
        DesktopFilesLocation::new(config).context("Could not collect application dirs")?;
    debug!("Locator config: {:#?}", location.config());
    Ok(location)
}

fn print_paths(paths: &[std::path::PathBuf], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(paths)?);
    } else {
        for p in paths {
            println!("{}", p.display());
        }
    }
    Ok(())
}

fn print_findings(findings: &[Finding], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(findings)?);
        return Ok(());
    }

    let failed = findings
        .iter()
        .filter(|f| matches!(f.status, Status::Failed { .. }))
        .count();
    println!(
        "Parsed .desktop entries ({}, {failed} failed):\n",
        findings.len()
    );

    for f in findings {
        println!("- {}", f.desktop_file.display());
        if let Some(name) = &f.name {
            println!("  Name: {name}");
        }
        if let Some(exec) = &f.exec {
            println!("  Exec: {exec}");
        }
        if let Some(program) = &f.program {
            println!("  Program: {program}");
        }
        if let Some(kind) = &f.kind {
            println!("  Type: {kind}");
        }
        println!("  Hidden: {}", f.hidden);

        match &f.status {
            Status::Parsed { sections } => print_sections(sections),
            Status::Failed { reason } => println!("  Reason: {reason}"),
        }
        println!();
    }
    Ok(())
}

fn print_sections(sections: &Sections) {
    for (header, keys) in sections {
        println!("  {header}");
        for (k, v) in keys {
            println!("    {k}={v}");
        }
    }
}
