//! `entiview` command-line driver

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use entiview_client::{ApiClient, ApiConfig, Credentials};
use entiview_core::{DetailRequest, RecordSummary, Session};
use entiview_record::TitleStrategy;
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let config_args = [
        Arg::new("config")
            .long("config")
            .value_name("FILE")
            .help("TOML file with base_url, timeouts and dns_fallback"),
        Arg::new("base-url")
            .long("base-url")
            .value_name("URL")
            .help("Override the API base URL"),
    ];

    Command::new("entiview")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Browse schema-less entities behind a keypass login")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("browse")
                .about("Log in, list entities and optionally show one in detail")
                .arg(Arg::new("username").long("username").required(true))
                .arg(Arg::new("password").long("password").required(true))
                .arg(
                    Arg::new("select")
                        .long("select")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Print the detail view of entity N (zero-based)"),
                )
                .arg(
                    Arg::new("title-field")
                        .long("title-field")
                        .value_name("FIELD")
                        .action(ArgAction::Append)
                        .help("Field to use as the entity title; repeat to set a preference order"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                )
                .args(config_args.clone()),
        )
        .subcommand(
            Command::new("config")
                .about("Print the effective configuration as TOML")
                .args(config_args),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("browse", args)) => browse(args).await,
        Some(("config", args)) => {
            let config = load_config(args)?;
            config.validate()?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        _ => unreachable!("subcommand_required"),
    }
}

fn load_config(args: &ArgMatches) -> Result<ApiConfig> {
    let mut config = match args.get_one::<String>("config") {
        Some(path) => ApiConfig::load(path).with_context(|| format!("loading {path}"))?,
        None => ApiConfig::default(),
    };
    if let Some(url) = args.get_one::<String>("base-url") {
        config = config.with_base_url(url.clone());
    }
    tracing::debug!(base_url = %config.base_url, "configuration resolved");
    Ok(config)
}

async fn browse(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    let api = ApiClient::new(&config).context("building API client")?;

    let strategy = match args.get_many::<String>("title-field") {
        Some(fields) => TitleStrategy::fields(fields.cloned()),
        None => TitleStrategy::FirstField,
    };
    let mut session = Session::new(&api, strategy);

    let username = args.get_one::<String>("username").cloned().unwrap_or_default();
    let password = args.get_one::<String>("password").cloned().unwrap_or_default();
    session.login(Credentials::new(username, password)).await?;
    session.load_dashboard().await?;

    let detail = args
        .get_one::<usize>("select")
        .map(|index| session.open_detail(*index))
        .transpose()?;

    let rows = session.summaries();
    let controller = session.controller();
    if args.get_flag("json") {
        let report = json!({
            "entities": rows,
            "received": controller.len(),
            "declared_total": controller.declared_total(),
            "detail": detail.as_ref().map(|request| json!({
                "title": request.payload.title(),
                "fields": request.payload.fields(),
                "text": request.payload.render(),
            })),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_rows(&rows);
        println!();
        if controller.total_mismatch() {
            println!(
                "{} entities received, server declared {}",
                controller.len(),
                controller.declared_total()
            );
        } else {
            println!("{} entities", controller.len());
        }
        if let Some(request) = &detail {
            print_detail(request);
        }
    }

    session.logout();
    Ok(())
}

fn print_rows(rows: &[RecordSummary]) {
    for (index, row) in rows.iter().enumerate() {
        println!("[{index}] {}", row.title);
        println!("    Property 1: {}", row.first);
        if let Some(second) = &row.second {
            println!("    Property 2: {second}");
        }
        println!("    {}", row.description);
    }
}

fn print_detail(request: &DetailRequest) {
    println!();
    println!("== {} ==", request.payload.title());
    println!("{}", request.payload.render());
}
