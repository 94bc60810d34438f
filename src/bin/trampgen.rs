// パス: src/bin/trampgen.rs
// 役割: Binary entrypoint that parses flags and runs one generation
// 意図: Offer the generator as a build-time command for native build systems
// 関連ファイル: src/pipeline.rs, src/config.rs, src/logging.rs
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};

use trampgen::pipeline::{load_dispatch, open_source, SourceKind};
use trampgen::{logging, EmitOptions, GenError, GeneratorConfig, Generator};

#[derive(Parser, Debug)]
#[command(name = "trampgen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate calling-convention trampolines for GL driver functions", long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["registry", "header"])))]
struct Cli {
    /// API registry XML to read declarations from
    #[arg(long, value_name = "FILE")]
    registry: Option<PathBuf>,

    /// C header to scrape `GLAPI ... APIENTRY` prototypes from
    #[arg(long, value_name = "FILE")]
    header: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short = 'o', long, value_name = "FILE")]
    outfile: Option<PathBuf>,

    /// Dispatch header whose SET_ macros select and wire the wrappers
    #[arg(long, value_name = "FILE")]
    dispatchheader: Option<PathBuf>,

    /// API prefix (overrides the config file)
    #[arg(long)]
    prefix: Option<String>,

    /// Emit the pre-resolution block
    #[arg(long)]
    preresolve: bool,

    /// Give every wrapper internal linkage
    #[arg(long)]
    staticwrappers: bool,

    /// Omit call tracing and direct-call counting
    #[arg(long)]
    nodbgcount: bool,

    /// Do not emit the runtime support prelude
    #[arg(long)]
    no_prelude: bool,

    /// JSON generator configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

fn run(cli: Cli) -> Result<(), GenError> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(prefix) = cli.prefix {
        config.prefix = prefix;
        config.validate()?;
    }

    let (kind, input) = match (cli.registry, cli.header) {
        (Some(path), _) => (SourceKind::Registry, path),
        (None, Some(path)) => (SourceKind::Header, path),
        (None, None) => {
            return Err(GenError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "either --registry or --header is required",
            )))
        }
    };
    log::info!("generating from {}", input.display());
    let mut source = open_source(kind, &input, &config)?;

    let options = EmitOptions {
        trace: !cli.nodbgcount,
        static_linkage: cli.staticwrappers,
        preresolve: cli.preresolve,
        prelude: !cli.no_prelude,
    };
    let dispatch = match &cli.dispatchheader {
        Some(path) => Some(load_dispatch(path, &config)?),
        None => None,
    };
    let mut generator = Generator::new(config, options);
    if let Some(req) = dispatch {
        generator = generator.with_dispatch(req);
    }

    let output = generator.run(source.as_mut());
    match &cli.outfile {
        Some(path) => fs::write(path, &output.text)?,
        None => io::stdout().lock().write_all(output.text.as_bytes())?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(logging::level_for(cli.verbose, cli.quiet));
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
