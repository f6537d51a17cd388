//! Command-line interface

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use gcodetexture_processing::{StreamStats, TextureStream};
use gcodetexture_settings::Config;

/// Path argument meaning stdin or stdout
const STDIO_PATH: &str = "-";

/// Suffix added to the input file stem for the default output name
const OUTPUT_SUFFIX: &str = "-textured";

#[derive(Parser, Debug)]
#[command(name = "gcodetexture")]
#[command(about = "Add radial ripples and flow bands to vase-mode G-code")]
#[command(version)]
pub struct Cli {
    /// Input G-code file (`-` for stdin)
    #[arg(required_unless_present = "dump_config")]
    pub input: Option<PathBuf>,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file (`-` for stdout); defaults to `<stem>-textured.<ext>` next to the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub dump_config: bool,
}

/// Default output path: `<stem>-textured.<ext>` in the input's directory
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, OUTPUT_SUFFIX),
    };
    input.with_file_name(name)
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}

/// Run the command line
///
/// Returns `None` when only the configuration was printed.
pub fn run(cli: &Cli) -> Result<Option<StreamStats>> {
    let config = Config::discover(cli.config.as_deref()).context("Failed to load configuration")?;

    if cli.dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(None);
    }

    let input = cli
        .input
        .as_deref()
        .context("No input file given")?;
    let output = match &cli.output {
        Some(path) => path.clone(),
        None if is_stdio(input) => PathBuf::from(STDIO_PATH),
        None => default_output_path(input),
    };

    let mut stream = TextureStream::new(config.build_engine()?);
    let stats = match (is_stdio(input), is_stdio(&output)) {
        (true, true) => stream.process(io::stdin().lock(), io::stdout().lock()),
        (true, false) => stream.process(io::stdin().lock(), create(&output)?),
        (false, true) => stream.process(open(input)?, io::stdout().lock()),
        (false, false) => stream.process(open(input)?, create(&output)?),
    }
    .with_context(|| format!("Failed to texture {}", input.display()))?;

    if !is_stdio(&output) {
        tracing::info!("Wrote {}", output.display());
    }
    Ok(Some(stats))
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/prints/cup.gcode")),
            PathBuf::from("/prints/cup-textured.gcode")
        );
        assert_eq!(
            default_output_path(Path::new("vase")),
            PathBuf::from("vase-textured")
        );
    }

    #[test]
    fn test_parse_arguments() {
        let cli =
            Cli::try_parse_from(["gcodetexture", "-vv", "-c", "t.toml", "cup.gcode"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("t.toml")));
        assert_eq!(cli.input, Some(PathBuf::from("cup.gcode")));
        assert!(!cli.dump_config);
    }

    #[test]
    fn test_input_required_unless_dumping() {
        assert!(Cli::try_parse_from(["gcodetexture"]).is_err());
        assert!(Cli::try_parse_from(["gcodetexture", "--dump-config"]).is_ok());
    }
}
