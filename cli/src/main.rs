//! `dnsdbq` — command-line client for passive DNS query services.

mod args;
mod config;
mod invocation;

use std::io::IsTerminal;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use dnsdbq_backend::Backend;
use dnsdbq_engine::{Framing, QueryOutcome, SharedWriter, TransportConfig, Writer, build_client, run_batch, run_json_input, run_query};
use dnsdbq_present::Presenter;
use tokio::sync::Mutex as AsyncMutex;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use args::Cli;
use config::ConfigEntry;

fn init_tracing(quiet: bool) {
    let floor = if quiet { "error" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(floor))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(std::io::stderr().is_terminal()))
        .with(env_filter)
        .init();
}

/// Resolve the backend name: `-u` > `DNSDBQ_BACKEND` env > config file > default.
fn resolve_backend_name(cli: &Cli, config: &[ConfigEntry]) -> String {
    if let Some(name) = &cli.backend {
        return name.clone();
    }
    if let Ok(name) = std::env::var("DNSDBQ_BACKEND") {
        return name;
    }
    if let Some(entry) = config.iter().find(|e| e.key.eq_ignore_ascii_case("backend")) {
        return entry.value.clone();
    }
    "dnsdb".to_string()
}

fn apply_config_entry(backend: &mut dyn Backend, entry: &ConfigEntry) -> Result<()> {
    let key = entry.key.to_ascii_lowercase();
    let setval_key = match key.as_str() {
        "apikey" | "dnsdb_api_key" => "apikey",
        "server" | "dnsdb_server" => "server",
        "eight_bit_clean" => "eight_bit_clean",
        "backend" => return Ok(()),
        _ => &key,
    };
    backend
        .setval(setval_key, &entry.value)
        .with_context(|| format!("config key {:?} rejected by backend", entry.key))
}

fn configure_backend(cli: &Cli, backend: &mut dyn Backend, config: &[ConfigEntry]) -> Result<()> {
    for entry in config {
        apply_config_entry(backend, entry)?;
    }

    if let Ok(key) = std::env::var("DNSDB_API_KEY") {
        backend.setval("apikey", &key).context("DNSDB_API_KEY rejected by backend")?;
    }
    if let Ok(server) = std::env::var("DNSDB_SERVER") {
        backend.setval("server", &server).context("DNSDB_SERVER rejected by backend")?;
    }
    if cli.eight_bit_clean {
        backend.setval("eight_bit_clean", "1").context("eight_bit_clean rejected by backend")?;
    }

    backend.ready().context("backend not ready")?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Vec<ConfigEntry>> {
    let path = cli
        .config_file
        .clone()
        .or_else(|| std::env::var("DNSDBQ_CONFIG_FILE").ok())
        .map(std::path::PathBuf::from)
        .or_else(config::default_path);

    match path {
        Some(p) if p.exists() => config::load(&p),
        _ => Ok(Vec::new()),
    }
}

fn http_timeout_secs() -> Option<u64> {
    std::env::var("DNSDBQ_HTTP_TIMEOUT").ok().and_then(|v| v.parse().ok())
}

fn print_outcome(outcome: &QueryOutcome, quiet: bool) {
    if outcome.exit_code_nonzero && !quiet {
        if let Some(message) = &outcome.message {
            eprintln!("dnsdbq: {message}");
        } else {
            eprintln!("dnsdbq: query failed");
        }
    }
}

async fn read_to_string_or_stdin(path: &str) -> Result<String> {
    if path == "-" {
        use tokio::io::AsyncReadExt;
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await.context("reading stdin")?;
        Ok(buf)
    } else {
        tokio::fs::read_to_string(path).await.with_context(|| format!("reading {path}"))
    }
}

async fn open_json_input(path: &str) -> Result<Box<dyn tokio::io::AsyncRead + Unpin>> {
    if path == "-" {
        Ok(Box::new(tokio::io::stdin()))
    } else {
        let file = tokio::fs::File::open(path).await.with_context(|| format!("opening {path}"))?;
        Ok(Box::new(file))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let config = load_config(&cli)?;
    let backend_name = resolve_backend_name(&cli, &config);
    let mut backend = dnsdbq_backend::by_name(&backend_name)
        .with_context(|| format!("unknown backend {backend_name:?}"))?;
    configure_backend(&cli, backend.as_mut(), &config)?;

    let params = invocation::build_params(&cli)?;
    let verb = invocation::build_verb(&cli)?;
    let output_format = invocation::build_output_format(&cli)?;
    let time_format = invocation::build_time_format();
    let sort_spec = invocation::build_sort_spec(&cli)?;

    let any_error;

    if let Some(batch_path) = &cli.batch_file {
        let transport = TransportConfig {
            timeout_secs: http_timeout_secs(),
            ipv4_only: cli.ipv4_only,
            ipv6_only: cli.ipv6_only,
            insecure: cli.insecure,
        };
        let client = build_client(&transport)?;

        let framing = match cli.framing {
            0 => Framing::None,
            1 => Framing::Terse,
            _ => Framing::Verbose,
        };

        let contents = read_to_string_or_stdin(batch_path).await?;
        let lines: Vec<String> = contents.lines().map(str::to_string).collect();

        any_error = run_batch(
            lines,
            &client,
            backend.as_ref(),
            params,
            verb,
            framing,
            cli.multiple,
            || {
                let presenter = Presenter::new(output_format, time_format, verb, dnsdbq_types::QueryMode::RrsetByName);
                Writer::new(presenter, params.output_limit, sort_spec.clone())
            },
            cli.quiet,
        )
        .await?;
    } else {
        let Some((flag, raw)) = cli.mode_arg() else {
            bail!("one of -r/-n/-i/-N/-R is required unless -b/--batch is given");
        };
        let descriptor = invocation::build_descriptor(flag, raw)?;

        let presenter = Presenter::new(output_format, time_format, verb, descriptor.mode());
        let writer = Writer::new(presenter, params.output_limit, sort_spec)?;
        let shared: SharedWriter = Rc::new(AsyncMutex::new(writer));

        let outcome = if let Some(json_path) = &cli.json_input {
            let reader = open_json_input(json_path).await?;
            let mut w = shared.lock().await;
            let report = run_json_input(reader, backend.encap(), &params, &mut w).await.context("reading JSON input")?;
            drop(w);
            QueryOutcome {
                status: Some(if report.exit_code_nonzero() { "error".to_string() } else { "noerror".to_string() }),
                message: report.message(),
                exit_code_nonzero: report.exit_code_nonzero(),
            }
        } else {
            let transport = TransportConfig {
                timeout_secs: http_timeout_secs(),
                ipv4_only: cli.ipv4_only,
                ipv6_only: cli.ipv6_only,
                insecure: cli.insecure,
            };
            let client = build_client(&transport)?;
            run_query(&client, backend.as_ref(), &descriptor, &params, verb, &shared, cli.quiet).await?
        };

        print_outcome(&outcome, cli.quiet);
        any_error = outcome.exit_code_nonzero;

        if let Ok(writer) = Rc::try_unwrap(shared) {
            writer.into_inner().finish().await?;
        }
    }

    if any_error {
        std::process::exit(1);
    }

    Ok(())
}
