use std::path::PathBuf;

use clap::Parser;

const DEFAULT_LOGO: &str = "images/logo.png";

#[derive(Parser, Debug)]
#[command(name = "survey-pdf", version, about = "Render survey results from JSON into a one-page PDF report")]
struct Args {
    /// Survey JSON file
    #[arg(default_value = "input.json")]
    input: PathBuf,

    /// Output PDF file
    #[arg(short, long, default_value = "output.pdf")]
    output: PathBuf,

    /// Logo image (PNG or JPEG). Defaults to images/logo.png when that file exists.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// JSON file overriding page geometry, fonts and colors
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut config = match survey_pdf::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    if let Some(logo) = args.logo {
        config.logo = Some(logo);
    } else if config.logo.is_none() && std::path::Path::new(DEFAULT_LOGO).is_file() {
        config.logo = Some(PathBuf::from(DEFAULT_LOGO));
    }

    if let Err(e) = survey_pdf::convert_json_to_pdf(&args.input, &args.output, &config) {
        exit_with(&e);
    }
    log::info!("Wrote {}", args.output.display());
}

fn exit_with(e: &survey_pdf::Error) -> ! {
    eprintln!("error: {e}");
    std::process::exit(1);
}
