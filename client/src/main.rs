//! marathonctl - Entry Point
//!
//! Small operations tool driving applications, groups and filtered
//! application sets on a Marathon control plane.

use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use tracing::{error, info};

use marathon_client::deploy::Deployments;
use marathon_client::http::client::HttpClient;
use marathon_client::http::Transport;
use marathon_client::logs::{init_logging, LogOptions};
use marathon_client::resources::{Application, FilteredApps, Groups};
use marathon_client::storage::settings::Settings;
use marathon_client::utils::version_info;

const USAGE: &str = "usage: marathonctl [--settings=<file>] (--app=<id> | --group=<id> | --filter=<prefix>) \
(--scale=<n> | --start=<n> | --stop | --restart | --tag=<tag> | --dump=<file>) [--force] [--await]";

/// Requested action
#[derive(Debug, Clone, PartialEq)]
enum Action {
    Scale(u32),
    Start(u32),
    Stop,
    Restart,
    Tag(String),
    Dump(String),
}

/// Resource the action targets
#[derive(Debug, Clone, PartialEq)]
enum Target {
    App(String),
    Group(String),
    Filter(String),
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("{}", e),
        }
        return;
    }

    if let Err(e) = run(&cli_args).await {
        error!("{:#}", e);
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli_args: &HashMap<String, String>) -> Result<()> {
    // Retrieve the settings file
    let settings = match cli_args.get("settings") {
        Some(path) => Settings::load(path)
            .await
            .with_context(|| format!("unable to read settings file {}", path))?,
        None => Settings::default(),
    }
    .with_env();

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        json_format: settings.json_logs,
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let target = parse_target(cli_args)?;
    let action = parse_action(cli_args)?;
    let force = flag(cli_args, "force");
    let wait = flag(cli_args, "await");

    let client = HttpClient::with_timeout(&settings.server.base_url, settings.server.request_timeout())?;
    let transport: Arc<dyn Transport> = Arc::new(client);
    info!("Running {:?} on {:?} against {}", action, target, settings.server.base_url);

    match target {
        Target::App(id) => {
            let mut app = Application::new(transport.clone());
            app.get(&id).await?;
            match &action {
                Action::Scale(n) => app.scale(*n, force).await?,
                Action::Start(n) => app.start(*n, force).await?,
                Action::Stop => app.stop(force).await?,
                Action::Restart => app.restart(force).await?,
                Action::Tag(tag) => app.set_tag(tag, force).await?,
                Action::Dump(path) => app.dump(path).await?,
            }

            if let Some(deployment) = app.deployment_id() {
                println!("{} {}", "deployment".green(), deployment);
                if wait {
                    let deployments = Deployments::with_options(
                        transport.clone(),
                        settings.deployment.tracker_options(),
                    );
                    deployments
                        .await_deployment(deployment, settings.deployment.timeout())
                        .await?;
                    println!("{} {}", "converged".green(), deployment);
                }
            }
        }
        Target::Group(id) => {
            let mut group = Groups::new(transport.clone());
            group.get(&id).await?;
            let report = match &action {
                Action::Scale(n) => group.scale_report(*n, force).await?,
                Action::Start(n) => group.start_report(*n, force).await?,
                Action::Stop => group.stop_report(force).await?,
                Action::Restart => group.restart_report(force).await?,
                Action::Dump(path) => {
                    group.dump(path).await?;
                    return Ok(());
                }
                Action::Tag(_) => bail!("--tag applies to a single --app"),
            };
            for (app, e) in &report.failures {
                eprintln!("{} {}: {}", "failed".red(), app, e);
            }
            println!("{} {} of {} apps", "done".green(), report.succeeded(), report.visited.len());
            report.into_last_error()?;
        }
        Target::Filter(prefix) => {
            let mut apps = FilteredApps::new(transport.clone());
            apps.get(&prefix).await?;
            println!("{} {} apps match {}", "found".green(), apps.len(), prefix);
            match &action {
                Action::Scale(n) => apps.scale(*n, force).await?,
                Action::Start(n) => apps.start(*n, force).await?,
                Action::Stop => apps.stop(force).await?,
                Action::Restart => apps.restart(force).await?,
                Action::Dump(path) => apps.dump(path).await?,
                Action::Tag(_) => bail!("--tag applies to a single --app"),
            }
        }
    }
    Ok(())
}

fn flag(cli_args: &HashMap<String, String>, key: &str) -> bool {
    cli_args.get(key).is_some_and(|v| v == "true")
}

fn parse_target(cli_args: &HashMap<String, String>) -> Result<Target> {
    let targets: Vec<Target> = [
        cli_args.get("app").cloned().map(Target::App),
        cli_args.get("group").cloned().map(Target::Group),
        cli_args.get("filter").cloned().map(Target::Filter),
    ]
    .into_iter()
    .flatten()
    .collect();

    match <[Target; 1]>::try_from(targets) {
        Ok([target]) => Ok(target),
        Err(_) => Err(anyhow!("exactly one of --app, --group or --filter is required\n{}", USAGE)),
    }
}

fn parse_action(cli_args: &HashMap<String, String>) -> Result<Action> {
    let count = |key: &str| -> Result<Option<u32>> {
        cli_args
            .get(key)
            .map(|v| v.parse::<u32>().with_context(|| format!("--{} expects a number, got {}", key, v)))
            .transpose()
    };

    if let Some(n) = count("scale")? {
        return Ok(Action::Scale(n));
    }
    if let Some(n) = count("start")? {
        return Ok(Action::Start(n));
    }
    if flag(cli_args, "stop") {
        return Ok(Action::Stop);
    }
    if flag(cli_args, "restart") {
        return Ok(Action::Restart);
    }
    if let Some(tag) = cli_args.get("tag") {
        return Ok(Action::Tag(tag.clone()));
    }
    if let Some(path) = cli_args.get("dump") {
        return Ok(Action::Dump(path.clone()));
    }
    bail!("no action given\n{}", USAGE)
}
