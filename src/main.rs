use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use env_logger::Env;

use irrigation_datparser::argsets::ProcessArgs;
use irrigation_datparser::constants::{defaults, envvars, transformer};
use irrigation_datparser::{command, helpers};

const HELP: &str = "\
Loads an irrigation flow meter CSV file into GeoStreams

USAGE:
  irrigation_datparser [OPTIONS] <FILE>...

OPTIONS:
  --batchsize <N>          maximum number of data points to submit in one request (default 3000)
  --clowder_url <URL>      the url of the Clowder instance to access for GeoStreams
  --clowder_key <KEY>      the key to use when accessing Clowder
  --site_override <SITE>   override the site name (default 'ua-mac')
  --working_space <DIR>    folder to write result.json into
  -h, --help               print this message
  -V, --version            print the transformer version

Processing one irrigation file at a time
";

fn is_candidate_file(arg: &OsString) -> bool {
    !arg.to_string_lossy().starts_with('-')
}

fn parse_args(mut args: pico_args::Arguments) -> Result<ProcessArgs> {
    Ok(ProcessArgs {
        batch_size: args.opt_value_from_str("--batchsize")?,
        clowder_url: args.opt_value_from_str("--clowder_url")?,
        clowder_key: args.opt_value_from_str("--clowder_key")?,
        site_override: args.opt_value_from_str("--site_override")?,
        working_space: args.opt_value_from_str("--working_space")?,
        files: args
            .finish()
            .into_iter()
            .filter(is_candidate_file)
            .map(PathBuf::from)
            .collect(),
    })
}

fn main() -> Result<()> {
    let dotenv_path = helpers::load_dotenv();
    env_logger::Builder::from_env(Env::default().filter_or(envvars::LOG_LEVEL, defaults::LOG_LEVEL))
        .init();
    if let Some(path) = dotenv_path {
        log::debug!("Loaded {}", path.display());
    }

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }
    if args.contains(["-V", "--version"]) {
        println!("{} {}", transformer::NAME, transformer::VERSION);
        return Ok(());
    }

    log::info!("{} {}", transformer::DESCRIPTION, transformer::VERSION);
    command::process(parse_args(args)?)?;
    Ok(())
}
