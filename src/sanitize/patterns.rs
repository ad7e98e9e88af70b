//! SQL-injection and XSS signature filtering.
//!
//! Two ordered rule lists. Each rule rewrites the output of the previous
//! one, and every match becomes the [`FILTERED`] sentinel. The `regex`
//! crate's linear-time engine keeps the permissive `.*?` spans from turning
//! adversarial input into a CPU sink; the per-field byte cap in the walker
//! is the second bound.

use regex::Regex;
use std::sync::LazyLock;

/// The sentinel substituted for any text matching a blacklisted pattern.
///
/// A visible token rather than silent deletion, so filtering shows up in
/// logs and responses.
pub const FILTERED: &str = "[FILTERED]";

// ═══════════════════════════════════════════════════════════════════════════════
// SQL Injection Signatures
// ═══════════════════════════════════════════════════════════════════════════════

/// Keyword-pair and function-call signatures, then the boolean-injection
/// idioms. Order matters: each rule sees the previous rule's output.
static SQL_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?is)\bunion\b.*?\bselect\b",
        r"(?is)\bselect\b.*?\bfrom\b",
        r"(?is)\binsert\b.*?\binto\b",
        r"(?is)\bupdate\b.*?\bset\b",
        r"(?is)\bdelete\b.*?\bfrom\b",
        r"(?is)\bdrop\b.*?\btable\b",
        r"(?is)\bcreate\b.*?\btable\b",
        r"(?is)\balter\b.*?\btable\b",
        r"(?i)\bexec\s*\(",
        r"(?i)\bexecute\s*\(",
        r"(?i)\bscript\s*\(",
        r"(?i)\bdeclare\s*\(",
        r"(?i)\bcast\s*\(",
        r"(?i)\bconvert\s*\(",
        r"(?i)\bextractvalue\s*\(",
        r"(?i)\bupdatexml\s*\(",
        r"(?i)\bload_file\s*\(",
        r"(?is)\binto\b.*?\boutfile\b",
        r"(?is)\binto\b.*?\bdumpfile\b",
        r"(?i)\bbenchmark\s*\(",
        r"(?i)\bsleep\s*\(",
        r"(?is)\bwaitfor\b.*?\bdelay\b",
        r"(?i)\bpg_sleep\s*\(",
        // Boolean injection idioms. The optional leading operand lets the
        // whole `1 OR 1=1` probe collapse into a single sentinel.
        r"(?i)(?:\w+\s+)?\bor\b\s+1\s*=\s*1\b",
        r"(?i)(?:\w+\s+)?\band\b\s+1\s*=\s*1\b",
        r"(?i)(?:\w+\s+)?\bor\b\s+'1'\s*=\s*'1'",
        r"(?i)(?:\w+\s+)?\band\b\s+'1'\s*=\s*'1'",
        r#"(?i)(?:\w+\s+)?\bor\b\s+"1"\s*=\s*"1""#,
        r#"(?i)(?:\w+\s+)?\band\b\s+"1"\s*=\s*"1""#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid SQL filter pattern"))
    .collect()
});

// ═══════════════════════════════════════════════════════════════════════════════
// XSS Signatures
// ═══════════════════════════════════════════════════════════════════════════════

/// Markup and script-vector signatures. Paired tags match their own closing
/// tag non-greedily across lines; void-style tags match bare.
static XSS_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?is)<script\b[^>]*>.*?</script\s*>",
        r"(?is)<iframe\b[^>]*>.*?</iframe\s*>",
        r"(?is)<object\b[^>]*>.*?</object\s*>",
        r"(?is)<embed\b[^>]*>.*?</embed\s*>",
        r"(?is)<applet\b[^>]*>.*?</applet\s*>",
        r"(?i)<meta\b[^>]*>",
        r"(?i)<link\b[^>]*>",
        r"(?is)<style\b[^>]*>.*?</style\s*>",
        r"(?i)javascript\s*:",
        r"(?i)vbscript\s*:",
        r"(?i)data\s*:\s*text/html",
        r"(?i)\bon\w+\s*=",
        r"(?is)<img\b[^>]*\bsrc\b[^>]*>",
        r"(?i)<svg\b[^>]*>?",
        r"(?i)<math\b[^>]*>?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid XSS filter pattern"))
    .collect()
});

// ═══════════════════════════════════════════════════════════════════════════════
// Filters
// ═══════════════════════════════════════════════════════════════════════════════

fn apply_rules(rules: &[Regex], input: &str) -> String {
    let mut current = input.to_string();
    for rule in rules {
        match rule.replace_all(&current, FILTERED) {
            std::borrow::Cow::Borrowed(_) => {}
            std::borrow::Cow::Owned(rewritten) => current = rewritten,
        }
    }
    current
}

/// Replace every SQL-injection signature with the [`FILTERED`] sentinel.
pub fn filter_sql(input: &str) -> String {
    apply_rules(&SQL_RULES, input)
}

/// Replace every XSS signature with the [`FILTERED`] sentinel.
pub fn filter_xss(input: &str) -> String {
    apply_rules(&XSS_RULES, input)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    // SQL filter

    #[test]
    fn test_union_select() {
        assert_eq!(filter_sql("UNION ALL SELECT password"), "[FILTERED] password");
    }

    #[test]
    fn test_select_from() {
        assert_eq!(filter_sql("SELECT name FROM users"), "[FILTERED] users");
    }

    #[test]
    fn test_boolean_or_probe_collapses_entirely() {
        assert_eq!(filter_sql("1 OR 1=1"), "[FILTERED]");
    }

    #[test]
    fn test_boolean_and_probe() {
        assert_eq!(filter_sql("x AND 1 = 1"), "[FILTERED]");
    }

    #[test]
    fn test_quoted_boolean_probe() {
        assert!(filter_sql("' OR '1'='1'").contains(FILTERED));
        assert!(filter_sql(r#"" OR "1"="1""#).contains(FILTERED));
    }

    #[test]
    fn test_stacked_function_calls() {
        assert!(filter_sql("1; EXEC(xp_cmdshell)").contains(FILTERED));
        assert!(filter_sql("BENCHMARK(5000000,MD5(1))").contains(FILTERED));
        assert!(filter_sql("pg_sleep(10)").contains(FILTERED));
        assert!(filter_sql("WAITFOR DELAY '0:0:5'").contains(FILTERED));
    }

    #[test]
    fn test_outfile_exfiltration() {
        assert!(filter_sql("INTO OUTFILE '/tmp/x'").contains(FILTERED));
        assert!(filter_sql("LOAD_FILE('/etc/passwd')").contains(FILTERED));
    }

    #[test]
    fn test_lone_keyword_is_not_filtered() {
        // Over-broad by design, but a lone keyword without its pair passes.
        assert_eq!(filter_sql("please select an option"), "please select an option");
        assert_eq!(filter_sql("I select my favorite color"), "I select my favorite color");
        assert_eq!(filter_sql("drop me a line"), "drop me a line");
    }

    #[test]
    fn test_sql_filter_idempotent() {
        for payload in [
            "1 OR 1=1",
            "UNION SELECT * FROM t",
            "DROP TABLE residents; --",
            "normal civic text",
        ] {
            let once = filter_sql(payload);
            assert_eq!(filter_sql(&once), once, "payload: {payload}");
        }
    }

    // XSS filter

    #[test]
    fn test_script_tag_pair() {
        assert_eq!(filter_xss("<script>alert('x')</script>"), "[FILTERED]");
    }

    #[test]
    fn test_script_tag_multiline() {
        assert_eq!(filter_xss("<script type=\"text/javascript\">\nalert(1)\n</script>"), "[FILTERED]");
    }

    #[test]
    fn test_img_with_event_handler() {
        assert_eq!(filter_xss("<img src=x onerror=alert(1)>"), "[FILTERED]");
    }

    #[test]
    fn test_embedded_vectors() {
        assert!(filter_xss("<iframe src='evil'></iframe>").contains(FILTERED));
        assert!(filter_xss("<meta http-equiv=refresh content=0>").contains(FILTERED));
        assert!(filter_xss("<svg onload=alert(1)>").contains(FILTERED));
        assert!(filter_xss("<math href=javascript:alert(1)>").contains(FILTERED));
    }

    #[test]
    fn test_protocol_vectors() {
        assert_eq!(filter_xss("javascript:alert(1)"), "[FILTERED]alert(1)");
        assert!(filter_xss("vbscript:msgbox(1)").contains(FILTERED));
        assert!(filter_xss("data:text/html,<p>").contains(FILTERED));
    }

    #[test]
    fn test_event_handler_attribute() {
        assert!(filter_xss("onmouseover = steal()").contains(FILTERED));
    }

    #[test]
    fn test_plain_markup_like_text_passes() {
        assert_eq!(filter_xss("2 < 3 and 5 > 4"), "2 < 3 and 5 > 4");
    }

    #[test]
    fn test_xss_filter_idempotent() {
        for payload in [
            "<script>alert(1)</script>",
            "<img src=x onerror=alert(1)>",
            "javascript:void(0)",
            "plain text",
        ] {
            let once = filter_xss(payload);
            assert_eq!(filter_xss(&once), once, "payload: {payload}");
        }
    }

    #[test]
    fn test_sentinel_survives_both_filters() {
        let sentinel = FILTERED.to_string();
        assert_eq!(filter_sql(&sentinel), sentinel);
        assert_eq!(filter_xss(&sentinel), sentinel);
    }
}
