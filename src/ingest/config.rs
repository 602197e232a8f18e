// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_INLINE: &str = "TRACKED_HASHTAGS";
const ENV_PATH: &str = "TRACKED_HASHTAGS_PATH";

/// Load the tracked-hashtags list from an explicit path. Supports TOML or
/// JSON formats.
pub fn load_tracked_from(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading tracked hashtags from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_tracked(&content, ext.as_str())
}

/// Load the tracked-hashtags list using env vars + fallbacks:
/// 1) $TRACKED_HASHTAGS (inline, comma-separated)
/// 2) $TRACKED_HASHTAGS_PATH
/// 3) config/hashtags.toml
/// 4) config/hashtags.json
pub fn load_tracked_default() -> Result<Vec<String>> {
    if let Ok(inline) = std::env::var(ENV_INLINE) {
        return Ok(clean_list(
            inline.split(',').map(|s| s.to_string()).collect(),
        ));
    }
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_tracked_from(&pb);
        } else {
            return Err(anyhow!("TRACKED_HASHTAGS_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/hashtags.toml");
    if toml_p.exists() {
        return load_tracked_from(&toml_p);
    }
    let json_p = PathBuf::from("config/hashtags.json");
    if json_p.exists() {
        return load_tracked_from(&json_p);
    }
    Ok(Vec::new())
}

fn parse_tracked(s: &str, hint_ext: &str) -> Result<Vec<String>> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("hashtags");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    // Try JSON array
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    // Fallback: also try TOML if not attempted
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported hashtags format"))
}

fn parse_toml(s: &str) -> Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct TomlTags {
        hashtags: Vec<String>,
    }
    let v: TomlTags = toml::from_str(s)?;
    Ok(clean_list(v.hashtags))
}

fn parse_json(s: &str) -> Result<Vec<String>> {
    let v: Vec<String> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

/// Trim, strip a leading `#`, lowercase, drop empties, dedupe.
fn clean_list(items: Vec<String>) -> Vec<String> {
    use std::collections::BTreeSet;
    let mut set = BTreeSet::new();
    for it in items {
        let t = it.trim().trim_start_matches('#').to_lowercase();
        if !t.is_empty() {
            set.insert(t);
        }
    }
    set.into_iter().collect()
}
