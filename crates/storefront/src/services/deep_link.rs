//! WhatsApp deep links.
//!
//! Mobile devices get a `wa.me` link that opens the app directly; everything
//! else gets the WhatsApp Web send page.

/// User-agent tokens that identify a mobile device (matched case-insensitively).
pub const MOBILE_TOKENS: &[&str] = &["iphone", "ipad", "ipod", "android"];

/// Kind of device the customer is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    Mobile,
    #[default]
    Desktop,
}

impl Platform {
    /// Detect the platform from a user-agent string.
    ///
    /// ```
    /// use bazar_storefront::services::deep_link::Platform;
    ///
    /// let ua = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36";
    /// assert_eq!(Platform::from_user_agent(ua), Platform::Mobile);
    /// assert_eq!(Platform::from_user_agent("curl/8.5.0"), Platform::Desktop);
    /// ```
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        if MOBILE_TOKENS.iter().any(|token| ua.contains(token)) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Link that opens a chat with `number` and `message` pre-filled.
///
/// `number` is digits only, country code included.
#[must_use]
pub fn whatsapp_link(number: &str, message: &str, platform: Platform) -> String {
    let text = urlencoding::encode(message);
    match platform {
        Platform::Mobile => format!("https://wa.me/{number}?text={text}"),
        Platform::Desktop => {
            format!("https://web.whatsapp.com/send?phone={number}&text={text}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_mobile_tokens_case_insensitively() {
        for ua in [
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
            "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X)",
            "mozilla/5.0 (ipod touch)",
            "Mozilla/5.0 (Linux; ANDROID 13)",
        ] {
            assert_eq!(Platform::from_user_agent(ua), Platform::Mobile, "{ua}");
        }
    }

    #[test]
    fn test_desktop_user_agents() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
        assert_eq!(Platform::from_user_agent(ua), Platform::Desktop);
        assert_eq!(Platform::from_user_agent(""), Platform::Desktop);
    }

    #[test]
    fn test_mobile_link() {
        let link = whatsapp_link("5491100000000", "Hola mundo", Platform::Mobile);
        assert_eq!(link, "https://wa.me/5491100000000?text=Hola%20mundo");
    }

    #[test]
    fn test_desktop_link() {
        let link = whatsapp_link("5491100000000", "a&b=c\n", Platform::Desktop);
        assert_eq!(
            link,
            "https://web.whatsapp.com/send?phone=5491100000000&text=a%26b%3Dc%0A"
        );
    }
}
