use bom_convert::sbom_conversion::domain::WireFormat;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// How the input format is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Detect from the input filename's extension
    Autodetect,
    Explicit(WireFormat),
}

impl InputFormat {
    /// The explicit format, if one was named
    pub fn explicit(self) -> Option<WireFormat> {
        match self {
            InputFormat::Autodetect => None,
            InputFormat::Explicit(format) => Some(format),
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("autodetect") || s.eq_ignore_ascii_case("auto") {
            return Ok(InputFormat::Autodetect);
        }
        WireFormat::from_str(s)
            .map(InputFormat::Explicit)
            .map_err(|e| format!("{} (or 'autodetect')", e))
    }
}

/// Convert CycloneDX SBOMs between formats and schema versions
#[derive(Parser, Debug)]
#[command(name = "bom-convert")]
#[command(version)]
#[command(about = "Convert CycloneDX SBOMs between JSON, XML, SPDX tag-value and CSV", long_about = None)]
pub struct Args {
    /// Input file path (if not specified, reads from stdin)
    #[arg(short = 'i', long, value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Input format: autodetect, json, xml, spdxtag or csv
    #[arg(long, value_name = "FORMAT")]
    pub input_format: Option<InputFormat>,

    /// Output format: json, xml, spdxtag or csv
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub output_format: Option<WireFormat>,

    /// Output version: a schema version such as 1.2, or an SPDX version
    /// such as 2.1 when the output format is spdxtag (defaults to the newest)
    #[arg(short = 's', long, value_name = "VERSION")]
    pub output_version: Option<String>,

    /// Path to a config file (defaults to bom-convert.config.yml in the
    /// current directory, if present)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// List every supported output format/version pair and exit
    #[arg(long)]
    pub list_formats: bool,

    /// Print diagnostic logging to stderr
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    /// Parses the process arguments, leaving error reporting to the caller
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}
