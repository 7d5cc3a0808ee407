mod cli;
mod config;

use anyhow::Context;
use bom_convert::adapters::outbound::console::StderrProgressReporter;
use bom_convert::application::dto::ConversionRequest;
use bom_convert::application::factories::{CodecRegistry, InputSource, IoFactory, OutputSink};
use bom_convert::application::use_cases::ConvertBomUseCase;
use bom_convert::sbom_conversion::domain::{FormatTarget, WireFormat};
use bom_convert::sbom_conversion::services::EncodingDetector;
use bom_convert::shared::error::{ExitCode, SbomError};
use bom_convert::shared::Result;
use cli::Args;
use config::ConfigFile;
use owo_colors::OwoColorize;
use std::path::Path;
use std::process;

fn main() {
    let args = match Args::try_parse_args() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are reported through clap as well
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    if let Err(e) = run(args) {
        eprintln!("\n{}\n", "❌ An error occurred:".red().bold());
        eprintln!("{}", e);

        // Display error chain
        for cause in e.chain().skip(1) {
            eprintln!("\n{} {}", "Caused by:".yellow(), cause);
        }

        eprintln!();
        process::exit(ExitCode::for_error(&e).as_i32());
    }
}

fn run(args: Args) -> Result<()> {
    let registry = CodecRegistry::standard();

    if args.list_formats {
        init_logging(args.verbose);
        for target in registry.encodable_targets() {
            println!("{}", target);
        }
        return Ok(());
    }

    let config = load_config(&args)?;
    init_logging(args.verbose || config.verbose.unwrap_or(false));

    let input_format = resolve_input_format(&args, &config)?;
    let target = resolve_output_target(&args, &config)?;
    log::debug!("Converting to {}", target);

    // Create adapters (Dependency Injection)
    let reader = IoFactory::reader(InputSource::from(args.input_file));
    let presenter = IoFactory::presenter(OutputSink::from(args.output_file));
    let progress_reporter = StderrProgressReporter::new();

    let (input, filename) = reader.read_bom()?;
    let mut request = ConversionRequest::new(input, target);
    if let Some(filename) = filename {
        request = request.with_filename(filename);
    }
    if let Some(format) = input_format {
        request = request.with_input_format(format);
    }

    // Execute use case
    let use_case = ConvertBomUseCase::new(registry, progress_reporter);
    let response = use_case.execute(request)?;

    // Present output
    presenter.present(&response.content)?;

    Ok(())
}

fn init_logging(verbose: bool) {
    let log_level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    let _ = env_logger::builder()
        .filter_level(log_level)
        .parse_default_env()
        .format_module_path(false)
        .try_init();
}

/// An explicit `--config` must exist; otherwise the current directory is searched
fn load_config(args: &Args) -> Result<ConfigFile> {
    match args.config {
        Some(ref path) => config::load_config_from_path(path),
        None => {
            let current_dir = std::env::current_dir()
                .context("Failed to determine the current directory")?;
            Ok(config::discover_config(&current_dir)?.unwrap_or_default())
        }
    }
}

/// The explicit input format, if any; `None` means detect from the filename
fn resolve_input_format(args: &Args, config: &ConfigFile) -> Result<Option<WireFormat>> {
    let format = args
        .input_format
        .or_else(|| config.input_format())
        .and_then(|f| f.explicit());

    if format.is_none() && args.input_file.is_none() {
        return Err(SbomError::InvalidRequest {
            reason: "Reading from stdin requires an explicit input format. Pass --input-format json, xml, spdxtag or csv".to_string(),
        }
        .into());
    }
    Ok(format)
}

/// Flags take precedence over the config file, which takes precedence over
/// detection on the output filename
fn resolve_output_target(args: &Args, config: &ConfigFile) -> Result<FormatTarget> {
    let format = args
        .output_format
        .or_else(|| config.output_format())
        .or_else(|| detect_output_format(args.output_file.as_deref()))
        .ok_or_else(|| SbomError::InvalidRequest {
            reason: "No output format given and none could be detected from the output filename. Pass --output-format".to_string(),
        })?;

    let version = args
        .output_version
        .as_deref()
        .or(config.output_version.as_deref());

    Ok(FormatTarget::parse(format, version)?)
}

fn detect_output_format(path: Option<&Path>) -> Option<WireFormat> {
    path.map(|p| EncodingDetector::detect(p))
        .filter(|format| *format != WireFormat::Unsupported)
}
