use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use locus_env::{ExecEnv, SeedGenerator};
use locus_ir::ident;

#[derive(Debug, Parser)]
#[command(name = "locus", version, about = "Runtime diagnostics for the locus query engine")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Probe the configured backend and report what it supports.
    Doctor(DoctorArgs),
    /// Escape an identifier for the textual IR.
    Escape(EscapeArgs),
    /// Unescape the body of a quoted identifier token.
    Unescape(UnescapeArgs),
    /// Draw seeds, reproducibly when a master seed is given.
    Seed(SeedArgs),
    /// Mint process-unique identifiers.
    Uid(UidArgs),
}

#[derive(Debug, Args)]
struct DoctorArgs {
    /// Emit the report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct EscapeArgs {
    id: String,
}

#[derive(Debug, Args)]
struct UnescapeArgs {
    body: String,
}

#[derive(Debug, Args)]
struct SeedArgs {
    #[arg(long)]
    master: Option<u64>,

    #[arg(long, default_value_t = 5)]
    count: u32,
}

#[derive(Debug, Args)]
struct UidArgs {
    #[arg(long)]
    base: Option<String>,

    #[arg(long, default_value_t = 1)]
    count: u32,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    ok: bool,
    backend: String,
    checks: Vec<Check>,
}

#[derive(Debug, Serialize)]
struct Check {
    name: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.cmd {
        Command::Doctor(args) => cmd_doctor(args),
        Command::Escape(args) => {
            println!("{}", ident::escape_id(&args.id));
            Ok(ExitCode::SUCCESS)
        }
        Command::Unescape(args) => {
            let id = ident::unescape_id(&args.body)
                .with_context(|| format!("cannot unescape {:?}", args.body))?;
            println!("{id}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Seed(args) => cmd_seed(args),
        Command::Uid(args) => cmd_uid(args),
    }
}

fn cmd_doctor(args: DoctorArgs) -> Result<ExitCode> {
    let env = ExecEnv::from_env();
    let mut checks: Vec<Check> = Vec::new();

    let backend = env.backend().context("backend construction failed")?;
    let kind = backend.kind();

    let fs = env.fs().context("filesystem accessor failed")?;
    checks.push(Check {
        name: "filesystem".to_string(),
        ok: true,
        detail: Some(format!("scheme {}", fs.scheme())),
    });

    match env.jvm_utils("locus doctor") {
        Ok(utils) => checks.push(Check {
            name: "jvm_bridge".to_string(),
            ok: true,
            detail: Some(utils.namespace().to_string()),
        }),
        Err(err) => checks.push(Check {
            name: "jvm_bridge".to_string(),
            ok: false,
            detail: Some(err.to_string()),
        }),
    }

    let table = env.dummy_table();
    checks.push(Check {
        name: "dummy_table".to_string(),
        ok: table.n_rows() == 1 && table.is_cached(),
        detail: None,
    });

    checks.push(Check {
        name: "uid".to_string(),
        ok: true,
        detail: Some(env.uid(Some("doctor"))),
    });

    env.log_info("locus doctor ran")
        .context("log forward failed")?;

    let report = DoctorReport {
        ok: checks.iter().all(|c| c.ok),
        backend: kind.to_string(),
        checks,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("backend: {}", report.backend);
        for c in &report.checks {
            let status = if c.ok { "ok" } else { "unsupported" };
            match &c.detail {
                Some(d) => println!("  {:<12} {status} ({d})", c.name),
                None => println!("  {:<12} {status}", c.name),
            }
        }
    }

    env.shutdown();
    Ok(ExitCode::SUCCESS)
}

fn cmd_seed(args: SeedArgs) -> Result<ExitCode> {
    let mut gen = SeedGenerator::from_master(args.master);
    for _ in 0..args.count {
        println!("{}", gen.next_seed());
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_uid(args: UidArgs) -> Result<ExitCode> {
    let env = ExecEnv::from_env();
    for _ in 0..args.count {
        println!("{}", env.uid(args.base.as_deref()));
    }
    Ok(ExitCode::SUCCESS)
}
