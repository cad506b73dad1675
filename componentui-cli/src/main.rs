use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use componentui::{
    Component, ComponentPatch, DocumentFormat, GatewayConfig, HttpGateway, OutputDestination,
    OutputOptions, Panel, apply_at, decode_component, emit, is_testable, locate, read_document,
    render_panel, resolve, run_test,
};

#[derive(Debug, Parser)]
#[command(
    name = "componentui",
    version,
    about = "Inspect, patch and test component configuration trees"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the component at PATH (the root by default)
    Show {
        file: PathBuf,
        /// Path expression, e.g. `participants[1]/model_client`
        #[arg(short = 'p', long = "path", value_name = "EXPR", default_value = "")]
        path: String,
        /// List the editable fields and nested links instead of the raw component
        #[arg(long = "fields")]
        fields: bool,
        /// Write JSON on one line (and TOML without table padding)
        #[arg(long = "compact")]
        compact: bool,
    },
    /// Apply a partial update at PATH and write the new root
    Set {
        file: PathBuf,
        #[arg(short = 'p', long = "path", value_name = "EXPR", default_value = "")]
        path: String,
        /// JSON object with the fields to change, e.g. `{"config":{"temperature":0.2}}`
        #[arg(long = "patch", value_name = "JSON")]
        patch: String,
        /// Output file ("-" or omitted writes to stdout)
        #[arg(short = 'o', long = "output", value_name = "DEST")]
        output: Option<String>,
        #[arg(long = "compact")]
        compact: bool,
    },
    /// Send the component at PATH to the validation service
    Test {
        file: PathBuf,
        #[arg(short = 'p', long = "path", value_name = "EXPR", default_value = "")]
        path: String,
        /// Base URL of the validation service
        #[arg(long = "url", value_name = "URL")]
        url: String,
        #[arg(long = "timeout", value_name = "SECS", default_value_t = 60)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Show {
            file,
            path,
            fields,
            compact,
        } => show(&file, &path, fields, compact),
        Command::Set {
            file,
            path,
            patch,
            output,
            compact,
        } => set(&file, &path, &patch, output.as_deref(), compact),
        Command::Test {
            file,
            path,
            url,
            timeout,
        } => run_validation(&file, &path, &url, Duration::from_secs(timeout)).await,
    }
}

fn show(file: &Path, expr: &str, fields: bool, compact: bool) -> Result<ExitCode> {
    let (root, format) = load_component(file)?;
    let node = node_at(&root, expr)?;
    if fields {
        match render_panel(&node) {
            Some(panel) => print_panel(&panel),
            None => println!("no editable fields for `{}` components", node.component_type),
        }
    } else {
        let value = serde_json::to_value(node.as_ref())?;
        let options = OutputOptions::new(encodable_format(&value, format)).with_pretty(!compact);
        emit(&value, &options).map_err(report)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn set(
    file: &Path,
    expr: &str,
    raw_patch: &str,
    output: Option<&str>,
    compact: bool,
) -> Result<ExitCode> {
    let (root, input_format) = load_component(file)?;
    let path = locate(&root, expr)?;
    let patch_value = serde_json::from_str(raw_patch).wrap_err("--patch is not valid JSON")?;
    let patch =
        ComponentPatch::from_json(patch_value).wrap_err("--patch is not a component patch")?;

    let updated = apply_at(&root, path.segments(), &patch);
    if Arc::ptr_eq(&updated, &root) {
        info!("patch did not change the component");
    }

    let (destination, format) = match output {
        None | Some("-") => (OutputDestination::Stdout, input_format),
        Some(dest) => {
            let format = DocumentFormat::from_extension(Path::new(dest)).unwrap_or(input_format);
            (OutputDestination::file(dest), format)
        }
    };
    let value = serde_json::to_value(updated.as_ref())?;
    let options = OutputOptions::new(encodable_format(&value, format))
        .with_pretty(!compact)
        .with_destination(destination);
    emit(&value, &options).map_err(report)?;
    Ok(ExitCode::SUCCESS)
}

async fn run_validation(
    file: &Path,
    expr: &str,
    url: &str,
    timeout: Duration,
) -> Result<ExitCode> {
    let (root, _) = load_component(file)?;
    let node = node_at(&root, expr)?;
    if !is_testable(&node) {
        return Err(eyre!(
            "only model components can be tested (found `{}`)",
            node.component_type
        ));
    }

    let gateway = HttpGateway::new(GatewayConfig::new(url).with_timeout(timeout))?;
    debug!(url, "testing {}", node.display_name());
    let result = run_test(&gateway, &node).await;

    let verdict = if result.status { "passed" } else { "failed" };
    match &result.message {
        Some(message) => println!("test {verdict}: {message}"),
        None => println!("test {verdict}"),
    }
    for line in &result.logs {
        println!("  {line}");
    }
    Ok(if result.status {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_component(file: &Path) -> Result<(Arc<Component>, DocumentFormat)> {
    let (value, format) = read_document(file).map_err(report)?;
    let component = decode_component(value)
        .wrap_err_with(|| format!("{} is not a component", file.display()))?;
    Ok((Arc::new(component), format))
}

/// TOML cannot hold `null`; such documents are written as JSON instead.
fn encodable_format(value: &Value, format: DocumentFormat) -> DocumentFormat {
    if format.can_encode(value) {
        return format;
    }
    warn!(%format, "document contains null values, writing JSON instead");
    DocumentFormat::Json
}

fn report(err: anyhow::Error) -> Report {
    eyre!("{err:#}")
}

fn node_at(root: &Arc<Component>, expr: &str) -> Result<Arc<Component>> {
    let path = locate(root, expr)?;
    resolve(root, path.segments())
        .cloned()
        .ok_or_else(|| eyre!("path `{expr}` does not resolve"))
}

fn print_panel(panel: &Panel) {
    println!("[{}]", panel.variant);
    for field in &panel.fields {
        println!(
            "{} ({}) = {}",
            field.title,
            field.target.pointer(),
            field.display_value()
        );
    }
    for link in &panel.links {
        let position = link
            .request
            .index
            .map(|index| format!("[{index}]"))
            .unwrap_or_default();
        println!(
            "-> {}: {} ({}{})",
            link.title, link.summary, link.request.parent_field, position
        );
    }
}
