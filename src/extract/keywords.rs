use crate::model::KeywordHit;
use crate::patterns::{patterns_for, PatternCategory};

/// Interesting-line records are capped per unit to bound report size.
pub const MAX_HITS_PER_UNIT: usize = 20;

/// Context strings are truncated to keep single minified lines readable.
const MAX_CONTEXT_CHARS: usize = 200;

/// Scan content line by line against the keyword list. At most one hit is
/// recorded per line, the first keyword in registry order wins.
pub fn scan_keywords(content: &str) -> Vec<KeywordHit> {
    let mut hits = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if hits.len() >= MAX_HITS_PER_UNIT {
            break;
        }
        for pattern in patterns_for(PatternCategory::Keyword) {
            if !pattern.regex.is_match(line) {
                continue;
            }
            let context: String = line.trim().chars().take(MAX_CONTEXT_CHARS).collect();
            if !context.is_empty() {
                hits.push(KeywordHit {
                    keyword: pattern.name.to_string(),
                    line: index + 1,
                    context,
                });
            }
            break;
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hit_per_line_first_keyword_wins() {
        let content = "let adminToken = getAuth();\nconsole.log('ok');\n";
        let hits = scan_keywords(content);
        assert_eq!(hits.len(), 1);
        // "admin" precedes "token" and "auth" in the keyword list
        assert_eq!(hits[0].keyword, "admin");
        assert_eq!(hits[0].line, 1);
    }

    #[test]
    fn line_numbers_are_one_based() {
        let content = "nothing here\nwebhook_url = x\n";
        let hits = scan_keywords(content);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, 2);
        assert_eq!(hits[0].keyword, "webhook");
    }

    #[test]
    fn hits_are_capped_per_unit() {
        let content = "debug\n".repeat(MAX_HITS_PER_UNIT + 10);
        assert_eq!(scan_keywords(&content).len(), MAX_HITS_PER_UNIT);
    }

    #[test]
    fn context_is_truncated() {
        let long_line = format!("debug {}", "x".repeat(500));
        let hits = scan_keywords(&long_line);
        assert_eq!(hits[0].context.chars().count(), 200);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let hits = scan_keywords("STAGING_HOST = h");
        assert_eq!(hits[0].keyword, "staging");
    }
}
