use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Load the target list. `input` is either a path to a newline-delimited
/// URL file or a single URL/host. Order-preserving dedup; an empty list is
/// a fatal precondition failure, the engine never runs with zero work.
pub fn read_targets(input: &str) -> Result<Vec<String>> {
    let raw: Vec<String> = if Path::new(input).is_file() {
        fs::read_to_string(input)?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(normalize_target)
            .collect()
    } else if !input.trim().is_empty() {
        vec![normalize_target(input.trim())]
    } else {
        Vec::new()
    };

    let mut seen = ahash::AHashSet::new();
    let targets: Vec<String> = raw.into_iter().filter(|t| seen.insert(t.clone())).collect();

    if targets.is_empty() {
        bail!("no targets to scan in {input:?}");
    }
    Ok(targets)
}

fn normalize_target(target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        format!("https://{target}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_url_passes_through() {
        let targets = read_targets("https://example.org/app").unwrap();
        assert_eq!(targets, vec!["https://example.org/app".to_string()]);
    }

    #[test]
    fn bare_host_gets_scheme() {
        let targets = read_targets("example.org").unwrap();
        assert_eq!(targets, vec!["https://example.org".to_string()]);
    }

    #[test]
    fn empty_input_is_fatal() {
        assert!(read_targets("   ").is_err());
    }

    #[test]
    fn file_targets_are_deduped_in_order() {
        let dir = std::env::temp_dir().join("websweep-target-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("targets.txt");
        fs::write(&path, "https://a.example\n\nhttps://b.example\nhttps://a.example\n").unwrap();
        let targets = read_targets(path.to_str().unwrap()).unwrap();
        assert_eq!(targets, vec!["https://a.example".to_string(), "https://b.example".to_string()]);
    }

    #[test]
    fn empty_file_is_fatal() {
        let dir = std::env::temp_dir().join("websweep-target-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.txt");
        fs::write(&path, "\n\n").unwrap();
        assert!(read_targets(path.to_str().unwrap()).is_err());
    }
}
