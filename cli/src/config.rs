//! Configuration file loading: `key=value` lines with in-process
//! `$VAR`/`${VAR}` expansion, no subprocess shell required.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

/// `~/.dnsdbq` (or platform equivalent via `dirs`).
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".dnsdbq"))
}

pub fn load(path: &Path) -> Result<Vec<ConfigEntry>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let env: HashMap<String, String> = std::env::vars().collect();
    Ok(parse(&contents, &env))
}

/// Parse `key=value` lines (`#`-comments and blank lines skipped), expanding
/// `$VAR`/`${VAR}` references against `env`.
#[must_use]
pub fn parse(contents: &str, env: &HashMap<String, String>) -> Vec<ConfigEntry> {
    let mut entries = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else { continue };
        entries.push(ConfigEntry {
            key: key.trim().to_string(),
            value: expand(value.trim().trim_matches('"'), env),
        });
    }
    entries
}

fn expand(value: &str, env: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }
        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                chars.next();
            } else {
                break;
            }
        }
        if braced && chars.peek() == Some(&'}') {
            chars.next();
        }
        if let Some(v) = env.get(&name) {
            out.push_str(v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_lines_skipping_comments_and_blanks() {
        let contents = "# comment\n\nAPIKEY=abc123\nSERVER=\"https://example.org\"\n";
        let entries = parse(contents, &HashMap::new());
        assert_eq!(
            entries,
            vec![
                ConfigEntry { key: "APIKEY".to_string(), value: "abc123".to_string() },
                ConfigEntry { key: "SERVER".to_string(), value: "https://example.org".to_string() },
            ]
        );
    }

    #[test]
    fn expands_braced_and_bare_variables() {
        let mut env = HashMap::new();
        env.insert("HOME".to_string(), "/home/alice".to_string());
        let entries = parse("CONFIG_DIR=${HOME}/.dnsdbq\nPLAIN=$HOME/x\n", &env);
        assert_eq!(entries[0].value, "/home/alice/.dnsdbq");
        assert_eq!(entries[1].value, "/home/alice/x");
    }

    #[test]
    fn unknown_variable_expands_to_empty_string() {
        let entries = parse("X=$MISSING-suffix\n", &HashMap::new());
        assert_eq!(entries[0].value, "-suffix");
    }
}
