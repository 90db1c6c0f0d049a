use anyhow::{Context, Result};
use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use rpassword::read_password;
use spectre::{
    AlgorithmVersion, Identicon, IdenticonColor, KeyPurpose, ResultType, ScryptConfig,
};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

pub const MAX_NAME_BYTES: usize = 64 * 1024;
pub const MAX_SECRET_BYTES: usize = 1024 * 1024;

pub struct RequestInfo<'a> {
    pub user_name: &'a str,
    pub site_name: &'a str,
    pub algorithm_version: AlgorithmVersion,
    pub purpose: KeyPurpose,
    pub result_type: ResultType,
    pub counter: u64,
    pub context: Option<&'a str>,
}

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

/// Branch and last-branch connectors for the settings tree.
pub fn get_tree_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("├─", "└─")
    } else {
        ("|-", "`-")
    }
}

fn validate_control_characters(s: &str, input_name: &str) -> Result<()> {
    let control_chars: Vec<(usize, char)> = s
        .chars()
        .enumerate()
        .filter(|(_, c)| c.is_control())
        .collect();

    if !control_chars.is_empty() {
        let term = Term::stderr();

        let warning_msg = format!(
            "WARNING: {} contains {} control character(s) at position(s): {}",
            input_name,
            control_chars.len(),
            control_chars
                .iter()
                .map(|(pos, _)| pos.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        term.write_line(&warning_msg)?;
        term.write_str("Continue anyway? [y/N]: ")?;
        term.flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;
        let response = response.trim().to_lowercase();

        term.clear_last_lines(2)?;

        if response != "y" && response != "yes" {
            anyhow::bail!("Aborted");
        }
    }

    Ok(())
}

/// Strips the line terminator and, when requested, applies NFC.
///
/// Inner and surrounding whitespace is kept: other implementations derive
/// from the exact bytes the user typed.
fn normalize(s: &str, nfc: bool) -> String {
    let line = s.trim_end_matches(['\r', '\n']);
    if nfc { line.nfc().collect() } else { line.to_string() }
}

pub fn normalize_and_validate(s: &str, input_name: &str, nfc: bool) -> Result<String> {
    let normalized = normalize(s, nfc);
    validate_control_characters(&normalized, input_name)?;
    Ok(normalized)
}

fn prompt_line(label: &str, nfc: bool) -> Result<String> {
    print!("In [{}]: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_context(|| format!("Failed to read {}", label))?;

    let normalized = normalize_and_validate(&input, label, nfc)?;
    if normalized.is_empty() {
        anyhow::bail!("{} cannot be empty", label);
    }
    if normalized.len() > MAX_NAME_BYTES {
        anyhow::bail!(
            "{} too long ({} bytes, maximum is {})",
            label,
            normalized.len(),
            MAX_NAME_BYTES
        );
    }

    Ok(normalized)
}

pub fn prompt_user_name(nfc: bool) -> Result<String> {
    prompt_line("user", nfc)
}

pub fn prompt_site_name(nfc: bool) -> Result<String> {
    prompt_line("site", nfc)
}

pub fn prompt_user_secret(nfc: bool) -> Result<Zeroizing<String>> {
    print!("In [secret]: ");
    io::stdout().flush()?;

    let secret = Zeroizing::new(read_password().context("Failed to fetch user secret")?);

    if secret.is_empty() {
        anyhow::bail!("User secret cannot be empty");
    }
    if secret.len() > MAX_SECRET_BYTES {
        anyhow::bail!(
            "User secret too long ({} bytes, maximum is {})",
            secret.len(),
            MAX_SECRET_BYTES
        );
    }

    let normalized = Zeroizing::new(normalize(&secret, nfc));
    validate_control_characters(&normalized, "User secret")?;
    Ok(normalized)
}

pub fn show_progress<F, T>(unicode_support: bool, f: F) -> Result<(T, Duration)>
where
    F: FnOnce() -> Result<T>,
{
    println!();

    let term = Term::stdout();
    term.hide_cursor().ok();

    let pb = ProgressBar::new_spinner();

    if unicode_support {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠋"]),
        );
    } else {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("-\\|/-"),
        );
    }

    pb.set_message("Deriving user key...");
    pb.enable_steady_tick(Duration::from_millis(80));

    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    pb.finish_and_clear();
    term.show_cursor().ok();

    result.map(|r| (r, elapsed))
}

fn identicon_style(color: IdenticonColor, color_support: bool) -> Style {
    if !color_support {
        return Style::new();
    }
    match color {
        IdenticonColor::Red => Style::new().red(),
        IdenticonColor::Green => Style::new().green(),
        IdenticonColor::Yellow => Style::new().yellow(),
        IdenticonColor::Blue => Style::new().blue(),
        IdenticonColor::Magenta => Style::new().magenta(),
        IdenticonColor::Cyan => Style::new().cyan(),
        IdenticonColor::Current => Style::new(),
    }
}

pub fn format_identicon(identicon: &Identicon, options: &DisplayOptions) -> String {
    if options.unicode_support {
        identicon_style(identicon.color, options.color_support)
            .apply_to(identicon.to_string())
            .to_string()
    } else {
        format!("[{}]", identicon.color.name())
    }
}

pub fn display_output(
    output: &Zeroizing<String>,
    identicon: &Identicon,
    request: &RequestInfo<'_>,
    elapsed: Duration,
    options: &DisplayOptions,
) {
    if options.quiet {
        println!("{}", &**output);
        return;
    }

    println!("Out[0]:\n{}\n", &**output);

    display_settings(identicon, request, options);
    display_stats(output, elapsed, options);
}

fn display_settings(identicon: &Identicon, request: &RequestInfo<'_>, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let (branch, last) = get_tree_symbols(options.unicode_support);

    let current = request.algorithm_version == AlgorithmVersion::CURRENT;
    let algorithm_style = if options.color_support {
        if current {
            Style::new().green()
        } else {
            Style::new().yellow()
        }
    } else {
        Style::new()
    };
    let algorithm_status = if current { check_ok } else { check_warn };

    let kdf = ScryptConfig::REFERENCE;

    println!("Settings:");

    println!(
        "  {} User       {} {}",
        branch,
        format_identicon(identicon, options),
        request.user_name
    );

    println!(
        "  {} Algorithm  {} {}{}",
        branch,
        algorithm_style.apply_to(format!("[{}]", algorithm_status)),
        algorithm_style.apply_to(request.algorithm_version),
        if current { "" } else { " (legacy)" }
    );

    println!(
        "  {} KDF        scrypt (N={}, r={}, p={}, {} MiB)",
        branch,
        kdf.cost(),
        kdf.r,
        kdf.p,
        kdf.memory_mib()
    );

    println!("  {} Site       {}", branch, request.site_name);
    println!("  {} Purpose    {}", branch, request.purpose);
    println!("  {} Counter    {}", branch, request.counter);

    if let Some(context) = request.context {
        println!("  {} Context    {}", branch, context);
    }

    println!("  {} Type       {}", last, request.result_type);

    println!();
}

fn display_stats(output: &Zeroizing<String>, elapsed: Duration, options: &DisplayOptions) {
    let (branch, last) = get_tree_symbols(options.unicode_support);
    let length = output.chars().count();

    println!("Stats:");
    println!(
        "  {} Length     {} {}",
        branch,
        length,
        if length == 1 { "char" } else { "chars" }
    );
    println!("  {} Time       {:.1}s", last, elapsed.as_secs_f64());
}

pub fn display_self_test(passed: bool, elapsed: Duration, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let style = match (options.color_support, passed) {
        (false, _) => Style::new(),
        (true, true) => Style::new().green(),
        (true, false) => Style::new().red(),
    };
    let (status, text) = if passed {
        (check_ok, "passed")
    } else {
        (check_warn, "FAILED")
    };

    println!(
        "{} Consistency test {} ({:.1}s)",
        style.apply_to(format!("[{}]", status)),
        style.apply_to(text),
        elapsed.as_secs_f64()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_status_symbols_unicode() {
        let (ok, warn) = get_status_symbols(true);
        assert_eq!(ok, "✓");
        assert_eq!(warn, "!");
    }

    #[test]
    fn test_get_status_symbols_ascii() {
        let (ok, warn) = get_status_symbols(false);
        assert_eq!(ok, "+");
        assert_eq!(warn, "!");
    }

    #[test]
    fn test_get_tree_symbols() {
        assert_eq!(get_tree_symbols(true), ("├─", "└─"));
        assert_eq!(get_tree_symbols(false), ("|-", "`-"));
    }

    #[test]
    fn test_normalize_strips_line_terminator_only() {
        let cases = vec![
            ("password\n", "password"),
            ("password\r\n", "password"),
            ("  pass word  \n", "  pass word  "),
            ("\tname", "\tname"),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize(input, false), expected);
        }
    }

    #[test]
    fn test_normalize_nfc_opt_in() {
        let nfc = "café";
        let nfd = "cafe\u{0301}";

        assert_ne!(normalize(nfd, false), normalize(nfc, false));
        assert_eq!(normalize(nfd, true), normalize(nfc, true));
        assert_eq!(normalize(nfd, true).as_bytes(), nfc.as_bytes());
    }

    #[test]
    fn test_normalize_unicode_variants() {
        let cases = vec![("Å", "A\u{030A}"), ("ñ", "n\u{0303}"), ("Wörlitz", "Wo\u{0308}rlitz")];

        for (nfc, nfd) in cases {
            assert_eq!(normalize(nfc, true), normalize(nfd, true));
        }
    }

    #[test]
    fn test_normalize_multibyte_preservation() {
        let inputs = vec!["жизнь", "生活", "생활", "⛄", "🌍🌎🌏"];

        for input in inputs {
            let normalized = normalize(input, true);
            assert_eq!(normalized.chars().count(), input.chars().count());
            assert_eq!(normalize(input, false), input);
        }
    }

    #[test]
    fn test_normalization_idempotent() {
        let input = "cafe\u{0301}";

        let first = normalize(input, true);
        let second = normalize(&first, true);

        assert_eq!(first, second);
    }

    #[test]
    fn test_format_identicon() {
        let identicon = Identicon {
            left_arm: "╔",
            body: "█",
            right_arm: "╗",
            accessory: "⛄",
            color: IdenticonColor::Blue,
        };

        let plain = DisplayOptions {
            unicode_support: true,
            color_support: false,
            quiet: false,
        };
        assert_eq!(format_identicon(&identicon, &plain), "╔█╗⛄");

        let ascii = DisplayOptions {
            unicode_support: false,
            color_support: false,
            quiet: false,
        };
        assert_eq!(format_identicon(&identicon, &ascii), "[blue]");
    }
}
