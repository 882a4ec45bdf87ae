//! Desktop/mobile form-factor oracle.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFactor {
    #[default]
    Desktop,
    Mobile,
}

fn mobile_ua_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)android|webos|iphone|ipad|ipod|blackberry|bb10|iemobile|windows phone|opera mini|kindle|silk|mobile",
        )
        .expect("valid regex")
    })
}

impl FormFactor {
    /// Classifies a `navigator.userAgent` string.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        if mobile_ua_re().is_match(user_agent) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    #[must_use]
    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Mobile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_phones_and_tablets() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
        let android = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Mobile Safari/537.36";
        assert_eq!(FormFactor::from_user_agent(iphone), FormFactor::Mobile);
        assert_eq!(FormFactor::from_user_agent(android), FormFactor::Mobile);
    }

    #[test]
    fn desktop_browsers_are_desktop() {
        let firefox =
            "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
        assert_eq!(FormFactor::from_user_agent(firefox), FormFactor::Desktop);
        assert!(!FormFactor::from_user_agent("").is_mobile());
    }
}
