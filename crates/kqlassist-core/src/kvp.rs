//! KVP parser: free text to [`KvpMap`].

use kqlassist_types::{AssistError, AssistResult, KeyCase, KvpMap, ParseError, ParseErrorReason};
use url::Url;

/// Parser options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub key_case: KeyCase,
}

impl ParseOptions {
    pub fn new(key_case: KeyCase) -> Self {
        Self { key_case }
    }
}

/// Parse with case-sensitive keys.
pub fn parse(text: &str) -> Result<KvpMap, ParseError> {
    parse_with(text, ParseOptions::default())
}

/// Parse `key=value` lines.
///
/// Lines are trimmed and blank lines skipped. The line is split at the first
/// `=`; the key is trimmed, the value is the rest of the trimmed line as-is.
/// Duplicate keys: last value wins.
pub fn parse_with(text: &str, options: ParseOptions) -> Result<KvpMap, ParseError> {
    let mut out = KvpMap::with_key_case(options.key_case);
    for (idx, raw) in text.split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(ParseError::new(idx + 1, ParseErrorReason::MissingSeparator));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ParseError::new(idx + 1, ParseErrorReason::EmptyKey));
        }
        out.insert(key, value);
    }
    Ok(out)
}

/// Turn a page URL's query parameters into KVP text, one `key=value` per line.
pub fn kvp_text_from_url(page_url: &str) -> AssistResult<String> {
    let url = Url::parse(page_url).map_err(|e| AssistError::InvalidUrl(format!("{page_url}: {e}")))?;
    Ok(url
        .query_pairs()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_pairs() {
        let kvp = parse("a=1\nb=2").unwrap();
        assert_eq!(kvp.len(), 2);
        assert_eq!(kvp.get("a"), Some("1"));
        assert_eq!(kvp.get("b"), Some("2"));
    }

    #[test]
    fn missing_separator_reports_line() {
        let err = parse("noeq").unwrap_err();
        assert_eq!(err, ParseError::new(1, ParseErrorReason::MissingSeparator));

        let err = parse("a=1\n\n  oops  \n").unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn empty_key_rejected() {
        let err = parse("=v").unwrap_err();
        assert_eq!(err, ParseError::new(1, ParseErrorReason::EmptyKey));
        let err = parse("a=1\n   = v").unwrap_err();
        assert_eq!(err, ParseError::new(2, ParseErrorReason::EmptyKey));
    }

    #[test]
    fn splits_on_first_equals_only() {
        let kvp = parse("filter=a==b").unwrap();
        assert_eq!(kvp.get("filter"), Some("a==b"));
    }

    #[test]
    fn crlf_and_blank_lines() {
        let kvp = parse("\r\n a = 1\r\n\r\n\tb=2 \r\n").unwrap();
        assert_eq!(kvp.get("a"), Some(" 1"));
        assert_eq!(kvp.get("b"), Some("2"));
        assert_eq!(kvp.len(), 2);
    }

    #[test]
    fn value_leading_whitespace_is_kept() {
        let kvp = parse("device=  HOST-1").unwrap();
        assert_eq!(kvp.get("device"), Some("  HOST-1"));
    }

    #[test]
    fn empty_value_allowed() {
        let kvp = parse("ip=").unwrap();
        assert_eq!(kvp.get("ip"), Some(""));
    }

    #[test]
    fn duplicate_key_last_wins() {
        let kvp = parse("ip=1.1.1.1\ndevice=d\nip=2.2.2.2").unwrap();
        assert_eq!(kvp.get("ip"), Some("2.2.2.2"));
        assert_eq!(kvp.to_text(), "ip=2.2.2.2\ndevice=d");
    }

    #[test]
    fn key_set_equals_trimmed_lhs() {
        let text = "  alpha =1\nbeta= 2\n gamma.x-y_z=3=4\n";
        let kvp = parse(text).unwrap();
        let mut keys: Vec<_> = kvp.keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["alpha", "beta", "gamma.x-y_z"]);
    }

    #[test]
    fn lowercase_mode() {
        let kvp = parse_with("Device=HOST\nIP=1.2.3.4", ParseOptions::new(KeyCase::Lowercase)).unwrap();
        assert_eq!(kvp.keys().collect::<Vec<_>>(), vec!["device", "ip"]);
        assert_eq!(kvp.get("DEVICE"), Some("HOST"));
    }

    #[test]
    fn empty_text_is_empty_map() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n \n\t").unwrap().is_empty());
    }

    #[test]
    fn url_params_to_text() {
        let text = kvp_text_from_url(
            "https://security.microsoft.com/v2/advanced-hunting?tid=abc&device=HOST%201",
        )
        .unwrap();
        assert_eq!(text, "tid=abc\ndevice=HOST 1");
        let kvp = parse(&text).unwrap();
        assert_eq!(kvp.get("tid"), Some("abc"));
    }

    #[test]
    fn url_without_query_gives_empty_text() {
        assert_eq!(kvp_text_from_url("https://example.com/").unwrap(), "");
        assert!(kvp_text_from_url("not a url").is_err());
    }
}
