use std::fmt::Write;

use chrono::{DateTime, Utc};
use clap::Args;
use der::Limits;
use x509::error::ErrorKind;
use x509::{Analyzer, CertificateInfo};

use crate::error::Result;
use crate::output::OutputFormat;
use crate::utils::read_input;

const DATE_FORMAT: &str = "%b %d %H:%M:%S %Y GMT";

#[derive(Clone, Copy, clap::ValueEnum, Debug)]
pub(crate) enum FingerprintAlgorithm {
    /// SHA1 fingerprint
    Sha1,
    /// SHA256 fingerprint (default)
    Sha256,
    /// SHA512 fingerprint
    Sha512,
}

impl From<FingerprintAlgorithm> for x509::FingerprintAlgorithm {
    fn from(alg: FingerprintAlgorithm) -> Self {
        match alg {
            FingerprintAlgorithm::Sha1 => x509::FingerprintAlgorithm::Sha1,
            FingerprintAlgorithm::Sha256 => x509::FingerprintAlgorithm::Sha256,
            FingerprintAlgorithm::Sha512 => x509::FingerprintAlgorithm::Sha512,
        }
    }
}

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the certificate file (PEM or DER format). If not specified, reads from stdin
    file: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Show only subject
    #[arg(long)]
    show_subject: bool,

    /// Show only issuer
    #[arg(long)]
    show_issuer: bool,

    /// Show only validity dates
    #[arg(long)]
    show_dates: bool,

    /// Show only serial number
    #[arg(long)]
    show_serial: bool,

    /// List all extensions
    #[arg(long)]
    list_extensions: bool,

    /// Show algorithm information
    #[arg(long)]
    show_algorithms: bool,

    /// Show certificate fingerprint
    #[arg(long)]
    show_fingerprint: bool,

    /// Check certificate expiry (exits with status 1 when expired)
    #[arg(long)]
    check_expiry: bool,

    /// Fingerprint algorithm (SHA1, SHA256, SHA512)
    #[arg(long, value_enum, default_value = "sha256")]
    fingerprint_alg: FingerprintAlgorithm,

    /// Show certificate purposes (from Extended Key Usage extension)
    #[arg(long)]
    show_purposes: bool,

    /// Show Subject Alternative Names (SAN)
    #[arg(long)]
    show_san: bool,

    /// Check if certificate is self-signed
    #[arg(long)]
    check_self_signed: bool,

    /// Evaluate validity at this instant (RFC 3339) instead of now
    #[arg(long)]
    at: Option<DateTime<Utc>>,

    /// Maximum DER nesting depth accepted by the parser
    #[arg(long, default_value_t = der::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl Config {
    fn should_show_specific_fields(&self) -> bool {
        self.show_subject
            || self.show_issuer
            || self.show_dates
            || self.show_serial
            || self.list_extensions
            || self.show_algorithms
            || self.show_fingerprint
            || self.check_expiry
            || self.show_purposes
            || self.show_san
            || self.check_self_signed
    }

    fn analyzer(&self) -> Analyzer {
        let analyzer = match self.at {
            Some(now) => Analyzer::at(now),
            None => Analyzer::default(),
        };
        analyzer.with_limits(Limits {
            max_depth: self.max_depth,
            ..Default::default()
        })
    }
}

// PEM first; input that carries no PEM block at all is retried as DER.
fn load_certificate(analyzer: &Analyzer, input: &[u8]) -> Result<CertificateInfo> {
    let Ok(text) = std::str::from_utf8(input) else {
        return Ok(analyzer.analyze_der(input)?);
    };
    match analyzer.analyze(text) {
        Err(e) if e.kind() == ErrorKind::InvalidPem => {
            tracing::debug!(error = %e, "no PEM certificate found, trying DER");
            analyzer.analyze_der(input).map_err(|_| e.into())
        }
        result => Ok(result?),
    }
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input = read_input(config.file.as_deref())?;
    let info = load_certificate(&config.analyzer(), &input)?;

    if config.should_show_specific_fields() {
        return show_specific_fields(&info, &config);
    }

    output_certificate(&info, &config)
}

fn show_specific_fields(info: &CertificateInfo, config: &Config) -> Result<()> {
    let mut output = String::new();

    if config.show_subject {
        writeln!(output, "Subject: {}", info.subject)?;
    }
    if config.show_issuer {
        writeln!(output, "Issuer: {}", info.issuer)?;
    }
    if config.show_dates {
        format_dates(&mut output, info)?;
    }
    if config.show_serial {
        writeln!(output, "Serial Number: {}", info.serial_number)?;
    }
    if config.list_extensions {
        format_extensions(&mut output, info)?;
    }
    if config.show_algorithms {
        writeln!(output, "Signature Algorithm: {}", info.signature_algorithm)?;
        writeln!(output, "Public Key Algorithm: {}", info.key_info.algorithm)?;
    }
    if config.show_fingerprint {
        let alg = x509::FingerprintAlgorithm::from(config.fingerprint_alg);
        let fingerprint = match alg {
            x509::FingerprintAlgorithm::Sha256 => info.fingerprints.sha256.clone(),
            x509::FingerprintAlgorithm::Sha1 => info.fingerprints.sha1.clone(),
            x509::FingerprintAlgorithm::Sha512 => x509::fingerprint(&der_of(info)?, alg),
        };
        writeln!(output, "{} Fingerprint: {}", alg, fingerprint)?;
    }
    if config.show_purposes {
        format_purposes(&mut output, info)?;
    }
    if config.show_san {
        format_san(&mut output, info)?;
    }
    if config.check_self_signed {
        let answer = if info.is_self_signed() { "Yes" } else { "No" };
        writeln!(output, "Self-Signed: {}", answer)?;
    }
    if config.check_expiry {
        let not_after = info.validity.not_after.format("%Y-%m-%d %H:%M:%S UTC");
        if info.validity.is_expired {
            writeln!(output, "Certificate is EXPIRED (expired on {})", not_after)?;
            print!("{}", output);
            std::process::exit(1);
        }
        writeln!(
            output,
            "Certificate is VALID (expires on {}, {} days remaining)",
            not_after, info.validity.days_remaining
        )?;
    }
    print!("{}", output);
    Ok(())
}

// The certificate bytes, recovered from the PEM text kept in `raw`.
fn der_of(info: &CertificateInfo) -> Result<Vec<u8>> {
    use kensa::decoder::Decoder;

    let pem = pem::Pem::find_certificate(&info.raw)?;
    Ok(pem.decode()?)
}

fn format_dates(output: &mut String, info: &CertificateInfo) -> Result<()> {
    writeln!(
        output,
        "Not Before: {}",
        info.validity.not_before.format(DATE_FORMAT)
    )?;
    writeln!(
        output,
        "Not After: {}",
        info.validity.not_after.format(DATE_FORMAT)
    )?;
    Ok(())
}

fn format_extensions(output: &mut String, info: &CertificateInfo) -> Result<()> {
    if info.extensions.is_empty() {
        writeln!(output, "No extensions")?;
        return Ok(());
    }
    writeln!(output, "Extensions:")?;
    for ext in &info.extensions.entries {
        let critical = if ext.critical { " (critical)" } else { "" };
        writeln!(output, "  {} [{}]{}", ext.name, ext.oid, critical)?;
    }
    Ok(())
}

fn format_purposes(output: &mut String, info: &CertificateInfo) -> Result<()> {
    match &info.extensions.ext_key_usage {
        Some(purposes) => {
            writeln!(output, "Certificate Purposes:")?;
            for purpose in purposes {
                writeln!(output, "  - {}", purpose)?;
            }
        }
        None => writeln!(output, "No Extended Key Usage extension found")?,
    }
    Ok(())
}

fn format_san(output: &mut String, info: &CertificateInfo) -> Result<()> {
    match &info.extensions.san {
        Some(names) if !names.is_empty() => {
            writeln!(output, "Subject Alternative Names:")?;
            for name in names {
                writeln!(output, "  {}", name)?;
            }
        }
        _ => writeln!(output, "Subject Alternative Names: (none)")?,
    }
    Ok(())
}

fn format_text(output: &mut String, info: &CertificateInfo) -> Result<()> {
    writeln!(output, "Certificate:")?;
    writeln!(output, "    Version: {}", info.version)?;
    writeln!(output, "    Serial Number: {}", info.serial_number)?;
    writeln!(output, "    Signature Algorithm: {}", info.signature_algorithm)?;
    writeln!(output, "    Issuer: {}", info.issuer)?;
    writeln!(output, "    Validity")?;
    writeln!(
        output,
        "        Not Before: {}",
        info.validity.not_before.format(DATE_FORMAT)
    )?;
    writeln!(
        output,
        "        Not After : {}",
        info.validity.not_after.format(DATE_FORMAT)
    )?;
    if info.validity.is_expired {
        writeln!(output, "        Expired")?;
    } else {
        writeln!(output, "        Days Remaining: {}", info.validity.days_remaining)?;
    }
    writeln!(output, "    Subject: {}", info.subject)?;
    writeln!(output, "    Subject Public Key Info:")?;
    writeln!(output, "        Public Key Algorithm: {}", info.key_info.algorithm)?;
    if let Some(curve) = &info.key_info.curve {
        writeln!(output, "        Curve: {}", curve)?;
    }
    if let Some(size) = info.key_info.key_size {
        writeln!(output, "        Key Size: {} bit", size)?;
    }

    let ext = &info.extensions;
    if !ext.is_empty() {
        writeln!(output, "    X509v3 extensions:")?;
        for entry in &ext.entries {
            let critical = if entry.critical { " critical" } else { "" };
            writeln!(output, "        {}:{}", entry.name, critical)?;
            let detail = match entry.oid.as_str() {
                x509::oid_name::OID_SUBJECT_ALT_NAME => ext.san.as_ref().map(|v| v.join(", ")),
                x509::oid_name::OID_KEY_USAGE => ext.key_usage.as_ref().map(|v| v.join(", ")),
                x509::oid_name::OID_EXT_KEY_USAGE => {
                    ext.ext_key_usage.as_ref().map(|v| v.join(", "))
                }
                x509::oid_name::OID_BASIC_CONSTRAINTS => ext.is_ca.map(|ca| {
                    match ext.path_len_constraint {
                        Some(n) => format!("CA:{}, pathlen:{}", ca.to_string().to_uppercase(), n),
                        None => format!("CA:{}", ca.to_string().to_uppercase()),
                    }
                }),
                _ => None,
            };
            if let Some(detail) = detail {
                writeln!(output, "            {}", detail)?;
            }
        }
    }

    writeln!(output, "    Fingerprints:")?;
    writeln!(output, "        SHA256: {}", info.fingerprints.sha256)?;
    writeln!(output, "        SHA1: {}", info.fingerprints.sha1)?;
    Ok(())
}

fn output_certificate(info: &CertificateInfo, config: &Config) -> Result<()> {
    match config.output {
        OutputFormat::Text => {
            let mut output = String::new();
            format_text(&mut output, info)?;
            print!("{}", output);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(info)?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let json_value = serde_json::to_value(info)?;
            let yaml = serde_yml::to_string(&json_value)?;
            print!("{}", yaml);
        }
        OutputFormat::Brief => {
            println!(
                "{} | Valid: {} to {}",
                info.subject,
                info.validity.not_before.format("%Y-%m-%d"),
                info.validity.not_after.format("%Y-%m-%d")
            );
        }
    }
    Ok(())
}
