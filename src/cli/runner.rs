use std::ffi::OsString;
use std::io::Write;

use clap::error::ErrorKind;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use pyrelease::{ProcessToolchain, ReleaseConfig, Toolchain, dispatch};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn emit(out: &mut dyn Write, text: &str) {
    // Nothing sensible to do if stdout is gone.
    let _ = writeln!(out, "{}", text.trim_end());
}

/// Parse tokens and resolve the config. `None` means the run is already
/// complete (usage or version was printed).
fn prepare(
    tokens: Vec<OsString>,
    out: &mut dyn Write,
) -> Result<Option<(CliArgs, ReleaseConfig)>, AppError> {
    if tokens.is_empty() {
        emit(out, &CliArgs::usage());
        return Ok(None);
    }

    let tokens = CliArgs::normalize(tokens)?;
    let args = match CliArgs::try_parse_tokens(tokens) {
        Ok(args) => args,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => {
            emit(out, &e.to_string());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    if args.log {
        init_logging();
    }

    let config = ReleaseConfig::resolve(args.config.as_deref(), args.overrides())?;
    debug!("Resolved config: {:?}", config);
    Ok(Some((args, config)))
}

fn perform(
    args: &CliArgs,
    config: &ReleaseConfig,
    tools: &Toolchain<'_>,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    if args.help {
        emit(out, &CliArgs::usage());
    }
    let actions = args.actions();
    let completed = dispatch(&actions, config, tools)?;
    info!("Completed {} step(s)", completed);
    Ok(())
}

fn finish(result: Result<(), AppError>, out: &mut dyn Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            emit(out, &e.to_string());
            e.exit_code()
        }
    }
}

/// Resolve the invocation, hand it to `work`, and map the outcome to an exit status.
fn drive<F>(tokens: Vec<OsString>, out: &mut dyn Write, work: F) -> u8
where
    F: FnOnce(&CliArgs, &ReleaseConfig, &mut dyn Write) -> Result<(), AppError>,
{
    let result = match prepare(tokens, out) {
        Ok(Some((args, config))) => work(&args, &config, out),
        Ok(None) => Ok(()),
        Err(e) => Err(e),
    };
    finish(result, out)
}

/// Run against the real tools. Returns the process exit status.
pub fn run(tokens: Vec<OsString>, out: &mut dyn Write) -> u8 {
    drive(tokens, out, |args, config, out| {
        let tools = ProcessToolchain::from_config(config);
        perform(args, config, &tools.toolchain(), out)
    })
}
