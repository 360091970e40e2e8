//! Headless client detection
//!
//! A root request from a browser gets the web page; a request from a script gets its
//! own IP address as plain text. The split is decided purely from the User-Agent.

/// Substrings that only browsers put in their User-Agent.
const BROWSER_MARKERS: [&str; 6] = [
    "Mozilla",
    "Firefox",
    "Opera",
    "Chrome",
    "AppleWebKit",
    "Safari",
];

/// PowerShell's `Invoke-WebRequest` sends a Mozilla-compatible UA.
const WINDOWS_SHELL_MARKER: &str = "WindowsPowerShell";

/// Only curl gets a trailing newline so the shell prompt lands on its own line.
const NEWLINE_MARKER: &str = "curl";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientKind {
    pub headless: bool,
    pub change_line: bool,
}

/// Classify a User-Agent.
///
/// A missing User-Agent is treated as an empty string: it carries no browser marker,
/// so the client is headless.
pub fn classify_user_agent(user_agent: Option<&str>) -> ClientKind {
    let ua = user_agent.unwrap_or_default();

    let looks_like_browser = BROWSER_MARKERS.iter().any(|m| ua.contains(m));
    let is_browser = looks_like_browser && !ua.contains(WINDOWS_SHELL_MARKER);

    ClientKind {
        headless: !is_browser,
        change_line: ua.contains(NEWLINE_MARKER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curl_is_headless_with_newline() {
        let kind = classify_user_agent(Some("curl/7.79.1"));
        assert!(kind.headless);
        assert!(kind.change_line);
    }

    #[test]
    fn test_wget_is_headless_without_newline() {
        let kind = classify_user_agent(Some("Wget/1.21.2"));
        assert!(kind.headless);
        assert!(!kind.change_line);
    }

    #[test]
    fn test_browsers_are_not_headless() {
        for ua in [
            "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
            "Opera/9.80 (Windows NT 6.1; U; en) Presto/2.8.131 Version/11.11",
            "Chrome",
        ] {
            assert!(!classify_user_agent(Some(ua)).headless, "{}", ua);
        }
    }

    #[test]
    fn test_powershell_is_headless() {
        let ua = "Mozilla/5.0 (Windows NT; Windows NT 10.0; en-US) WindowsPowerShell/5.1.19041.1682";
        let kind = classify_user_agent(Some(ua));
        assert!(kind.headless);
        assert!(!kind.change_line);
    }

    #[test]
    fn test_missing_or_empty_user_agent() {
        assert_eq!(
            classify_user_agent(None),
            ClientKind {
                headless: true,
                change_line: false
            }
        );
        assert_eq!(classify_user_agent(Some("")), classify_user_agent(None));
    }
}
