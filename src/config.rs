//! Credential configuration for the API gateway CI toolkit
//!
//! Credentials live in an INI-style `.edgerc` file made of `[section]` blocks:
//!
//! ```ini
//! [default]
//! host = akab-xxxx.luna.akamaiapis.net
//! client_token = akab-client-token
//! client_secret = ${AKAMAI_CLIENT_SECRET}
//! access_token = akab-access-token
//! max_body = 131072
//! ```
//!
//! ## Environment Variable Expansion
//!
//! Values support environment variable expansion with the following syntax:
//! - `${VAR}` - Simple substitution
//! - `${VAR:-default}` - Use default if VAR is unset or empty
//! - `${VAR-default}` - Use default if VAR is unset
//! - `${VAR:+alt}` - Use alt if VAR is set and non-empty
//! - `${VAR+alt}` - Use alt if VAR is set

use anyhow::{bail, Context};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use std::{env, fmt, fs, path::Path, path::PathBuf};

use crate::constants::{DEFAULT_EDGERC_FILE, DEFAULT_MAX_BODY};

/// Key material for one `.edgerc` section
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API host without scheme, e.g. `akab-xxxx.luna.akamaiapis.net`
    pub host: String,
    pub client_token: String,
    pub client_secret: String,
    pub access_token: String,
    /// Largest body prefix included in the signature content hash
    pub max_body: usize,
}

impl Credentials {
    pub fn base_url(&self) -> String {
        format!("https://{}", self.host)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("client_token", &"<redacted>")
            .field("client_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("max_body", &self.max_body)
            .finish()
    }
}

pub fn default_edgerc_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_EDGERC_FILE)
}

/// Load the credentials of `section` from the `.edgerc` file at `path`
pub fn load_edgerc(path: &Path, section: &str) -> anyhow::Result<Credentials> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading credentials file {}", path.display()))?;
    parse_edgerc(&raw, section)
        .with_context(|| format!("loading section [{}] of {}", section, path.display()))
}

pub fn parse_edgerc(content: &str, section: &str) -> anyhow::Result<Credentials> {
    let sections = parse_sections(content);
    let Some(values) = sections.get(section) else {
        bail!("section [{}] not found", section);
    };

    let required = |key: &str| -> anyhow::Result<String> {
        match values.get(key) {
            Some(v) if !v.is_empty() => Ok(v.clone()),
            _ => bail!("missing required key '{}'", key),
        }
    };

    let max_body = match values.get("max_body") {
        Some(v) if !v.is_empty() => v
            .parse()
            .with_context(|| format!("invalid max_body '{v}'"))?,
        _ => DEFAULT_MAX_BODY,
    };

    Ok(Credentials {
        host: normalize_host(&required("host")?),
        client_token: required("client_token")?,
        client_secret: required("client_secret")?,
        access_token: required("access_token")?,
        max_body,
    })
}

fn normalize_host(host: &str) -> String {
    let host = host
        .strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host);
    host.trim_end_matches('/').to_string()
}

fn parse_sections(content: &str) -> HashMap<String, HashMap<String, String>> {
    static SECTION: OnceLock<Regex> = OnceLock::new();
    static ENTRY: OnceLock<Regex> = OnceLock::new();
    let section_re =
        SECTION.get_or_init(|| Regex::new(r"^\[([^\]]+)\]$").expect("valid section regex"));
    let entry_re = ENTRY.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_.\-]+)\s*[=:]\s*(.*)$").expect("valid entry regex")
    });

    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(caps) = section_re.captures(line) {
            let name = caps[1].trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }
        // entries before the first header have no section and are ignored
        if let (Some(name), Some(caps)) = (&current, entry_re.captures(line)) {
            let value = expand_env_placeholders(caps[2].trim());
            sections
                .entry(name.clone())
                .or_default()
                .insert(caps[1].to_lowercase(), value);
        }
    }
    sections
}

pub fn expand_env_placeholders(input: &str) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?:(:?[-+])([^}]*))?\}")
            .expect("valid placeholder regex")
    });
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let op = caps.get(2).map_or("", |m| m.as_str());
        let val = caps.get(3).map_or("", |m| m.as_str());
        let var = env::var(var_name).ok();

        match (var.as_deref(), op) {
            (Some(v), "") => v.to_string(),                       // ${VAR}
            (Some(v), ":-") if !v.is_empty() => v.to_string(),    // ${VAR:-default}
            (_, ":-") => val.to_string(),
            (Some(v), "-") => v.to_string(),                      // ${VAR-default}
            (None, "-") => val.to_string(),
            (Some(v), ":+") if !v.is_empty() => val.to_string(),  // ${VAR:+alt}
            (Some(_), "+") => val.to_string(),                    // ${VAR+alt}
            _ => String::new(),
        }
    })
    .to_string()
}
