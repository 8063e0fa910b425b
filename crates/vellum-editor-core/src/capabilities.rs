//! Browser capability flags.
//!
//! Engine-specific behavior differences are resolved once at editor
//! construction from the host user-agent string, instead of being sniffed at
//! each call site. Hosts outside a browser pass an empty string and get the
//! neutral defaults.

/// Capability flags for the hosting environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrowserCapabilities {
    /// WebKit/Safari: composition end and key events race; selection reads
    /// right after a composition are unreliable.
    pub is_safari: bool,
    /// Gecko/Firefox: extra selection changes fire during IME composition.
    pub is_firefox: bool,
    /// Android: Backspace may be reported with no effect, requiring a
    /// deferred check after the default action.
    pub is_android: bool,
    /// Whether `beforeinput`-style semantic input events are available.
    pub supports_before_input: bool,
}

impl BrowserCapabilities {
    /// Resolve capabilities from a user-agent string.
    pub fn detect(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        let is_firefox = ua.contains("firefox");
        let is_chromium = ua.contains("chrome") || ua.contains("chromium") || ua.contains("edg");
        let is_safari = ua.contains("safari") && !is_chromium;
        let is_android = ua.contains("android");

        Self {
            is_safari,
            is_firefox,
            is_android,
            supports_before_input: !ua.is_empty() && !is_firefox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAFARI_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15";
    const CHROME_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
    const FIREFOX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0";
    const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 14) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Mobile Safari/537.36";

    #[test]
    fn test_detect_safari() {
        let caps = BrowserCapabilities::detect(SAFARI_UA);
        assert!(caps.is_safari);
        assert!(!caps.is_firefox);
        assert!(!caps.is_android);
    }

    #[test]
    fn test_detect_chrome_is_not_safari() {
        let caps = BrowserCapabilities::detect(CHROME_UA);
        assert!(!caps.is_safari);
        assert!(caps.supports_before_input);
    }

    #[test]
    fn test_detect_firefox() {
        let caps = BrowserCapabilities::detect(FIREFOX_UA);
        assert!(caps.is_firefox);
        assert!(!caps.supports_before_input);
    }

    #[test]
    fn test_detect_android() {
        assert!(BrowserCapabilities::detect(ANDROID_UA).is_android);
    }

    #[test]
    fn test_headless_defaults() {
        assert_eq!(BrowserCapabilities::detect(""), BrowserCapabilities::default());
    }
}
