//! Prints allow-list digests for a digest-mode gate.
//!
//! ```text
//! $ auth-gate-digest --salt pepper --toml you@gmail.com teammate@gmail.com
//! [allow_list]
//! mode = "digest"
//! salt = "pepper"
//! entries = [
//!     "3f1c...",
//!     "9a07...",
//! ]
//! ```

use auth_gate_access::allow_list::email_digest;
use auth_gate_core::EmailAddress;
use clap::Parser;
use rootcause::Report;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "auth-gate-digest", version)]
#[command(about = "Print salted allow-list digests for an auth-gate deployment")]
struct Cli {
    /// Salt prepended to each normalized email before hashing.
    ///
    /// Must match `allow_list.salt` in the deployed gate.toml.
    #[arg(short, long, env = "AUTH_GATE_SALT", default_value = "")]
    salt: String,

    /// Read emails from a file, one per line. Blank lines and lines
    /// starting with `#` are skipped.
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Print a ready-to-paste `[allow_list]` table instead of bare digests.
    #[arg(long)]
    toml: bool,

    /// Emails to hash.
    #[arg(value_name = "EMAIL")]
    emails: Vec<String>,
}

#[derive(Debug)]
enum DigestError {
    NoEmails,
    ReadFailed { path: PathBuf, reason: String },
    InvalidEmail { origin: String, reason: String },
    RenderFailed { reason: String },
}

impl fmt::Display for DigestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEmails => write!(f, "no emails given (pass them as arguments or with --file)"),
            Self::ReadFailed { path, reason } => {
                write!(f, "failed to read {}: {reason}", path.display())
            }
            Self::InvalidEmail { origin, reason } => write!(f, "{origin}: {reason}"),
            Self::RenderFailed { reason } => write!(f, "failed to render output: {reason}"),
        }
    }
}

impl std::error::Error for DigestError {}

fn main() -> Result<(), Report<DigestError>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let emails = collect_emails(&cli)?;

    if cli.salt.is_empty() {
        tracing::warn!("hashing without a salt; digests of common addresses are guessable");
    }

    let digests = digests(&cli.salt, &emails);
    tracing::info!(count = digests.len(), "computed digests");

    if cli.toml {
        print!("{}", render_toml(&cli.salt, &digests)?);
    } else {
        for digest in &digests {
            println!("{digest}");
        }
    }
    Ok(())
}

/// Gathers emails from the file (first) and the arguments.
fn collect_emails(cli: &Cli) -> Result<Vec<EmailAddress>, Report<DigestError>> {
    let mut emails = match &cli.file {
        Some(path) => read_emails_file(path)?,
        None => Vec::new(),
    };

    for (index, raw) in cli.emails.iter().enumerate() {
        let email = EmailAddress::parse(raw.as_str()).map_err(|e| DigestError::InvalidEmail {
            origin: format!("argument {}", index + 1),
            reason: e.to_string(),
        })?;
        emails.push(email);
    }

    if emails.is_empty() {
        return Err(DigestError::NoEmails.into());
    }
    Ok(emails)
}

fn read_emails_file(path: &Path) -> Result<Vec<EmailAddress>, Report<DigestError>> {
    let contents = std::fs::read_to_string(path).map_err(|e| DigestError::ReadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let emails = parse_email_lines(&contents).map_err(|(line, reason)| {
        DigestError::InvalidEmail {
            origin: format!("{}:{line}", path.display()),
            reason,
        }
    })?;
    tracing::debug!(path = %path.display(), count = emails.len(), "read emails");
    Ok(emails)
}

/// Parses one email per line, returning the 1-based line number of the
/// first bad entry on failure.
fn parse_email_lines(contents: &str) -> Result<Vec<EmailAddress>, (usize, String)> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| EmailAddress::parse(line).map_err(|e| (number, e.to_string())))
        .collect()
}

/// Hashes every email, dropping duplicates while keeping first-seen order.
fn digests(salt: &str, emails: &[EmailAddress]) -> Vec<String> {
    let mut digests: Vec<String> = Vec::with_capacity(emails.len());
    for email in emails {
        let digest = email_digest(salt, email);
        if !digests.contains(&digest) {
            digests.push(digest);
        }
    }
    digests
}

/// Renders an `[allow_list]` table for gate.toml.
fn render_toml(salt: &str, digests: &[String]) -> Result<String, Report<DigestError>> {
    // JSON string literals are valid TOML basic strings.
    let quoted_salt = serde_json::to_string(salt).map_err(|e| DigestError::RenderFailed {
        reason: e.to_string(),
    })?;

    let mut out = String::from("[allow_list]\nmode = \"digest\"\n");
    out.push_str(&format!("salt = {quoted_salt}\n"));
    out.push_str("entries = [\n");
    for digest in digests {
        out.push_str(&format!("    \"{digest}\",\n"));
    }
    out.push_str("]\n");
    Ok(out)
}
