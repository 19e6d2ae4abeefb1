use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ncr_core::{parse_label, FormValues, Section, Stage, WorkflowConfig};
use ncr_store::{FileStore, SharedStore};
use ncr_workflow::{
    ExportOptions, JsonReportRenderer, NotificationCenter, Orientation, PageLocation, Report,
    ReportRenderer, StageController, SubmitError, Workflow,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn cli() -> Command {
    Command::new("ncr")
        .version(ncr_core::VERSION)
        .about("Non-conformance report workflow")
        .subcommand_required(true)
        .arg(
            Arg::new("store")
                .long("store")
                .global(true)
                .default_value("ncr-store.json")
                .value_parser(value_parser!(PathBuf))
                .help("Key/value store file"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Workflow configuration (TOML)"),
        )
        .subcommand(
            Command::new("role")
                .about("Show or change the current role")
                .subcommand(Command::new("show").about("Print the current role"))
                .subcommand(
                    Command::new("set")
                        .about("Persist a new role")
                        .arg(Arg::new("label").required(true).help("Role label or synonym")),
                ),
        )
        .subcommand(
            Command::new("new").about("Print a blank Quality form with the next NCR number"),
        )
        .subcommand(
            Command::new("submit")
                .about("Submit one stage's form")
                .arg(
                    Arg::new("stage")
                        .required(true)
                        .help("quality, engineering, procurement or final"),
                )
                .arg(
                    Arg::new("field")
                        .long("field")
                        .short('f')
                        .action(ArgAction::Append)
                        .help("Field value as key=value"),
                ),
        )
        .subcommand(Command::new("list").about("Dashboard rows for the current role"))
        .subcommand(
            Command::new("view")
                .about("Show a record as the current role sees it")
                .arg(Arg::new("number").required(true))
                .arg(
                    Arg::new("section")
                        .long("section")
                        .help("Section to show: a name, an element id or 'all'"),
                ),
        )
        .subcommand(
            Command::new("notifications")
                .about("List notifications for the current role")
                .arg(
                    Arg::new("mark-all")
                        .long("mark-all")
                        .action(ArgAction::SetTrue)
                        .help("Mark every listed notification read"),
                )
                .arg(Arg::new("mark").long("mark").help("Mark one notification read")),
        )
        .subcommand(
            Command::new("export")
                .about("Render a record with every section")
                .arg(Arg::new("number").required(true))
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output file or directory, defaults to stdout"),
                )
                .arg(
                    Arg::new("landscape")
                        .long("landscape")
                        .action(ArgAction::SetTrue)
                        .help("Landscape pages"),
                )
                .arg(
                    Arg::new("margin")
                        .long("margin")
                        .value_parser(value_parser!(f64))
                        .help("Page margin in millimetres"),
                ),
        )
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let Some((command, args)) = matches.subcommand() else {
        return Ok(());
    };
    // Global options land in the subcommand's matches.
    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => WorkflowConfig::load(path)?,
        None => WorkflowConfig::default(),
    };
    let store_path = args
        .get_one::<PathBuf>("store")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("ncr-store.json"));
    tracing::debug!("Using store {}", store_path.display());
    let store: SharedStore = Arc::new(FileStore::open(store_path));
    let workflow = Workflow::new(store, config);

    match command {
        "role" => role(&workflow, args),
        "new" => print_json(&workflow.new_form()?),
        "submit" => submit(&workflow, args),
        "list" => print_json(&workflow.dashboard()?),
        "view" => view(&workflow, args),
        "notifications" => notifications(&workflow, args),
        "export" => export(&workflow, args),
        other => bail!("unknown command {other}"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn role(workflow: &Workflow, args: &ArgMatches) -> anyhow::Result<()> {
    if let Some(("set", set)) = args.subcommand() {
        let label = set
            .get_one::<String>("label")
            .context("missing role label")?;
        workflow.set_role(parse_label(label)?)?;
    }
    let role = workflow.role()?;
    println!("{} ({})", role.label(), role.display_name());
    Ok(())
}

fn submit(workflow: &Workflow, args: &ArgMatches) -> anyhow::Result<()> {
    let stage: Stage = args
        .get_one::<String>("stage")
        .context("missing stage")?
        .parse()?;
    let mut form = FormValues::new();
    for pair in args.get_many::<String>("field").into_iter().flatten() {
        let Some((key, value)) = FormValues::parse_pair(pair) else {
            bail!("expected key=value, got {pair:?}");
        };
        form.set(&key, value);
    }

    match workflow.submit(stage, &form) {
        Ok(outcome) => print_json(&outcome),
        Err(SubmitError::Validation(report)) => {
            eprintln!("{}", report.summary());
            if let Some(field) = report.first_invalid() {
                eprintln!("First invalid field: {field}");
            }
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}

fn view(workflow: &Workflow, args: &ArgMatches) -> anyhow::Result<()> {
    let number = args.get_one::<String>("number").context("missing number")?;
    if workflow.records().find(number)?.is_none() {
        bail!("no NCR numbered {number}");
    }
    let model = workflow.view(Some(number))?;

    let location = PageLocation {
        section: args.get_one::<String>("section").cloned(),
        fragment: None,
    };
    let mut tabs = StageController::open(&Section::ALL, &location, None);
    tabs.role_changed(model.role);
    if let Some(raw) = location.section.as_deref() {
        if let Err(e) = tabs.select_named(raw) {
            tracing::warn!("{}", e);
        }
    }

    print_json(&serde_json::json!({
        "view": model,
        "tabs": tabs.tabs(),
        "visibleSections": tabs.visible_sections(),
    }))
}

fn notifications(workflow: &Workflow, args: &ArgMatches) -> anyhow::Result<()> {
    let role = workflow.role()?;
    let center = workflow.notifications();
    if let Some(id) = args.get_one::<String>("mark") {
        if !center.mark_read(id)? {
            bail!("no notification {id}");
        }
    }
    if args.get_flag("mark-all") {
        center.mark_all_read(role)?;
    }
    let badge = NotificationCenter::badge(center.unread_count(role)?);
    let entries: Vec<_> = center
        .for_role(role)?
        .into_iter()
        .map(|n| serde_json::json!({ "icon": n.kind.icon(), "entry": n }))
        .collect();
    print_json(&serde_json::json!({
        "badge": badge,
        "notifications": entries,
    }))
}

fn export(workflow: &Workflow, args: &ArgMatches) -> anyhow::Result<()> {
    let number = args.get_one::<String>("number").context("missing number")?;
    let record = workflow
        .records()
        .find(number)?
        .with_context(|| format!("no NCR numbered {number}"))?;
    let mut options = ExportOptions::default();
    if args.get_flag("landscape") {
        options = options.with_orientation(Orientation::Landscape);
    }
    if let Some(margin) = args.get_one::<f64>("margin") {
        options = options.with_margin(*margin);
    }

    let renderer = JsonReportRenderer;
    let report = Report::from_record(&record);
    let bytes = renderer.render(&report, &options)?;
    match args.get_one::<PathBuf>("out") {
        Some(out) => {
            // A directory gets the report's own file name.
            let path = if out.is_dir() {
                out.join(Path::new(&report.file_name).with_extension(renderer.extension()))
            } else {
                out.clone()
            };
            std::fs::write(&path, &bytes)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Exported {} as {}", number, path.display());
        }
        None => println!("{}", String::from_utf8_lossy(&bytes)),
    }
    Ok(())
}
