//! Subdomain extraction from patch bodies.
//!
//! A hostname qualifies as a subdomain when it ends in a known public suffix
//! and has at least one label in front of its registrable domain. For
//! `api.example.co.uk` the suffix is `co.uk`, the registrable domain is
//! `example.co.uk` and `api` makes it a subdomain.
//!
//! Patches are mostly source code, so the suffix table is an allow list:
//! member chains such as `self.config.total` and file names such as
//! `jest.config.js` end in labels that are not listed and never match.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static HOSTNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}\b")
        .expect("hostname pattern is valid")
});

static PERCENT_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[0-9A-Fa-f]{2}").expect("escape pattern is valid"));

/// Single-label public suffixes accepted as top-level domains.
///
/// Suffixes that read as common identifiers or file extensions in source code
/// (`id`, `info`, `pk`, `bg`, `rs`, `py`, `pl`, `pt`, `sh`, `md`) are left out.
const TOP_LEVEL_SUFFIXES: &[&str] = &[
    // generic
    "com", "net", "org", "edu", "gov", "mil", "biz", "io", "dev", "ai", "xyz",
    // country codes
    "ae", "ar", "au", "br", "ca", "ch", "cl", "cn", "co", "cz", "de", "dk", "ee", "es", "eu",
    "fi", "fr", "gr", "hk", "hr", "hu", "ie", "il", "in", "it", "jp", "kr", "kz", "lu", "lv",
    "me", "mx", "nl", "nz", "ph", "ro", "ru", "se", "sg", "si", "sk", "tr", "tv", "tw",
    "ua", "uk", "us", "vn", "za",
];

/// Two-label public suffixes under which registrations happen.
const SECOND_LEVEL_SUFFIXES: &[&str] = &[
    "ac.uk", "co.uk", "gov.uk", "org.uk", "ltd.uk", "plc.uk", "com.au", "net.au", "org.au",
    "edu.au", "gov.au", "co.nz", "org.nz", "co.jp", "ne.jp", "or.jp", "ac.jp", "co.kr",
    "or.kr", "com.br", "net.br", "org.br", "com.cn", "net.cn", "org.cn", "com.mx", "com.ar",
    "com.tr", "com.tw", "com.hk", "com.sg", "co.in", "net.in", "org.in", "co.za",
    "co.il", "com.ua", "com.vn", "com.ph",
];

/// Extracts the distinct subdomains referenced in `text`, lowercased, in order of first appearance.
#[must_use]
pub fn extract_subdomains(text: &str) -> Vec<String> {
    // Split URL-encoded hosts such as `%2F%2Fapi.example.com` from their escapes.
    let text = PERCENT_ESCAPE.replace_all(text, " ");

    let mut seen = HashSet::new();
    HOSTNAME
        .find_iter(&text)
        .map(|m| m.as_str().to_ascii_lowercase())
        .filter(|host| is_subdomain(host))
        .filter(|host| seen.insert(host.clone()))
        .collect()
}

fn is_subdomain(host: &str) -> bool {
    let labels: Vec<&str> = host.split('.').collect();
    match suffix_labels(&labels) {
        // suffix, registrable label, and at least one more in front
        Some(suffix) => labels.len() >= suffix + 2,
        None => false,
    }
}

/// Number of labels making up the public suffix of `labels`, if it has a known one.
fn suffix_labels(labels: &[&str]) -> Option<usize> {
    let [.., second, top] = labels else {
        return None;
    };
    if SECOND_LEVEL_SUFFIXES.contains(&format!("{second}.{top}").as_str()) {
        Some(2)
    } else if TOP_LEVEL_SUFFIXES.contains(top) {
        Some(1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_subdomains_in_patch() {
        let patch = "\
diff --git a/src/config.rs b/src/config.rs
--- a/src/config.rs
+++ b/src/config.rs
@@ -1,3 +1,3 @@
-const API: &str = \"https://api.staging.example.com/v1\";
+const API: &str = \"https://api.example.com/v1\";
 // see docs.example.org and example.net
";

        let subdomains = extract_subdomains(patch);

        assert_eq!(
            subdomains,
            vec!["api.staging.example.com", "api.example.com", "docs.example.org"]
        );
    }

    #[test]
    fn deduplicates_case_insensitively() {
        let subdomains = extract_subdomains("CDN.Example.com cdn.example.com cdn.EXAMPLE.COM");
        assert_eq!(subdomains, vec!["cdn.example.com"]);
    }

    #[test]
    fn ignores_file_names() {
        let subdomains = extract_subdomains("edited jest.config.js and app.module.ts and v1.2.3");
        assert!(subdomains.is_empty());
    }

    #[test]
    fn ignores_member_access_chains() {
        let patch = "+    let t = self.config.total;\n+    req.headers.insert(x);\n+    std.fs.write(p);\n+    if row.user.id == 0 {}\n";
        assert!(extract_subdomains(patch).is_empty());
    }

    #[test]
    fn registrable_domains_under_two_label_suffixes_are_not_subdomains() {
        let subdomains = extract_subdomains("see example.co.uk and www.example.co.uk");
        assert_eq!(subdomains, vec!["www.example.co.uk"]);
    }

    #[test]
    fn splits_percent_encoded_hosts() {
        let subdomains = extract_subdomains("redirect=https%3A%2F%2Flogin.example.com%2Fcallback");
        assert_eq!(subdomains, vec!["login.example.com"]);
    }

    #[test]
    fn empty_text_has_no_subdomains() {
        assert!(extract_subdomains("").is_empty());
    }
}
