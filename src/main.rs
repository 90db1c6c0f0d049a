mod logging;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use spectre::types::COUNTER_DEFAULT;
use spectre::{
    AlgorithmTables, AlgorithmVersion, KeyPurpose, ResultType, SpectreUser, consistency_check,
};
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "spectre",
    version,
    author,
    about = "Stateless site password generator using the Spectre algorithm"
)]
struct Cli {
    /// Site to derive a result for; prompted when absent
    site_name: Option<String>,

    #[arg(short, long, env = "SPECTRE_USERNAME")]
    user_name: Option<String>,

    #[arg(
        short,
        long,
        env = "SPECTRE_ALGORITHM",
        default_value_t = AlgorithmVersion::CURRENT.as_u32(),
        value_parser = clap::value_parser!(u32).range(0..=3)
    )]
    algorithm: u32,

    /// Result type by name (long, pin, phrase, ...), alias (x l m s b i n p) or number
    #[arg(short = 't', long = "type")]
    result_type: Option<ResultType>,

    #[arg(short, long, value_enum, default_value = "authentication")]
    purpose: Purpose,

    #[arg(
        short,
        long,
        default_value_t = COUNTER_DEFAULT,
        value_parser = clap::value_parser!(u64).range(1..=4294967295)
    )]
    counter: u64,

    #[arg(short = 'C', long)]
    context: Option<String>,

    /// Apply NFC normalisation to names and the secret
    #[arg(long)]
    nfc: bool,

    /// Print only the result
    #[arg(short, long)]
    quiet: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Run the built-in consistency test and exit
    #[arg(long)]
    self_test: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum Purpose {
    #[value(alias = "a", alias = "auth")]
    Authentication,
    #[value(alias = "i", alias = "ident")]
    Identification,
    #[value(alias = "r", alias = "rec")]
    Recovery,
}

impl From<Purpose> for KeyPurpose {
    fn from(purpose: Purpose) -> Self {
        match purpose {
            Purpose::Authentication => KeyPurpose::Authentication,
            Purpose::Identification => KeyPurpose::Identification,
            Purpose::Recovery => KeyPurpose::Recovery,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let tables = AlgorithmTables::STANDARD;

    let display_options = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: cli.quiet,
    };

    if cli.self_test {
        let start = Instant::now();
        let passed = consistency_check(&tables)?;
        ui::display_self_test(passed, start.elapsed(), &display_options);
        if !passed {
            anyhow::bail!("Consistency test failed");
        }
        return Ok(());
    }

    let algorithm_version = AlgorithmVersion::try_from(cli.algorithm)?;
    let purpose = KeyPurpose::from(cli.purpose);
    let result_type = cli
        .result_type
        .unwrap_or_else(|| purpose.default_result_type());

    // Fail before the secret prompt and the slow KDF.
    if tables.templates(result_type).is_none() {
        anyhow::bail!(
            "Result type {} cannot be generated; choose a template type",
            result_type
        );
    }

    let user_name = match cli.user_name {
        Some(name) => ui::normalize_and_validate(&name, "user", cli.nfc)?,
        None => ui::prompt_user_name(cli.nfc)?,
    };
    let user_secret = ui::prompt_user_secret(cli.nfc)?;
    let site_name = match cli.site_name {
        Some(name) => ui::normalize_and_validate(&name, "site", cli.nfc)?,
        None => ui::prompt_site_name(cli.nfc)?,
    };
    let context = cli.context.as_deref().filter(|c| !c.is_empty());

    let ((output, identicon), elapsed) = ui::show_progress(display_options.unicode_support, || {
        let user = SpectreUser::new(&user_name, &user_secret, algorithm_version, &tables)?;
        let output = user.result(&site_name, result_type, cli.counter, purpose, context)?;
        Ok((output, user.identicon()))
    })
    .context("Failed to generate site result")?;

    let request = ui::RequestInfo {
        user_name: &user_name,
        site_name: &site_name,
        algorithm_version,
        purpose,
        result_type,
        counter: cli.counter,
        context,
    };

    ui::display_output(&output, &identicon, &request, elapsed, &display_options);

    Ok(())
}
