//! Turning a chosen action into a concrete side effect.
//!
//! Planning is pure: [`plan`] reads the active session and returns an
//! [`Effect`]. The controller performs the effect through its platform.

use serde::{Deserialize, Serialize};

use crate::classify::{ContactKind, InstallMode, MAILTO, SMS, TEL};
use crate::error::{Error, Result};
use crate::extract::{MailBundle, ParameterBundle, TelBundle};
use crate::session::Session;

pub const GMAIL_COMPOSE: &str = "https://mail.google.com/mail/?extsrc=mailto&url=";
pub const OUTLOOK_COMPOSE: &str = "https://outlook.live.com/owa/?path=/mail/action/compose&to=";
pub const YAHOO_COMPOSE: &str = "https://compose.mail.yahoo.com/?to=";
pub const TELEGRAM_BASE: &str = "https://t.me/";
pub const WHATSAPP_BASE: &str = "https://wa.me/";
pub const SKYPE_SCHEME: &str = "skype:";

/// Something the user can choose in a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Gmail,
    Outlook,
    Yahoo,
    Telegram,
    #[serde(rename = "whatsapp")]
    WhatsApp,
    Skype,
    Copy,
    #[serde(rename = "default")]
    OpenDefault,
}

impl Action {
    pub const ALL: [Self; 8] = [
        Self::Gmail,
        Self::Outlook,
        Self::Yahoo,
        Self::Telegram,
        Self::WhatsApp,
        Self::Skype,
        Self::Copy,
        Self::OpenDefault,
    ];

    /// Name used in configuration and in `#mailgo-*` button hrefs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gmail => "gmail",
            Self::Outlook => "outlook",
            Self::Yahoo => "yahoo",
            Self::Telegram => "telegram",
            Self::WhatsApp => "whatsapp",
            Self::Skype => "skype",
            Self::Copy => "copy",
            Self::OpenDefault => "default",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Whether the action makes sense for a contact of `kind`.
    #[must_use]
    pub const fn applies_to(self, kind: ContactKind) -> bool {
        match self {
            Self::Gmail | Self::Outlook | Self::Yahoo => matches!(kind, ContactKind::Mail),
            Self::Telegram | Self::WhatsApp | Self::Skype => kind.uses_tel_modal(),
            Self::Copy | Self::OpenDefault => true,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A side effect to perform on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", content = "value", rename_all = "snake_case")]
pub enum Effect {
    /// Open in a new browsing context with no opener or referrer.
    OpenDetached(String),
    /// Navigate the current page (hands the URL to the OS handler).
    Navigate(String),
    /// Put text on the clipboard.
    Copy(String),
}

/// Plans `action` against the active session.
pub fn plan(action: Action, session: &Session) -> Result<Effect> {
    let kind = session.active.kind;
    if !action.applies_to(kind) {
        return Err(Error::ActionUnavailable { action, kind });
    }

    let effect = match (&session.bundle, action) {
        (_, Action::Copy) => Effect::Copy(session.bundle.copy_text().to_string()),
        (_, Action::OpenDefault) => open_default(session)?,
        (ParameterBundle::Mail(mail), Action::Gmail) => Effect::OpenDetached(gmail_url(mail)),
        (ParameterBundle::Mail(mail), Action::Outlook) => Effect::OpenDetached(outlook_url(mail)),
        (ParameterBundle::Mail(mail), Action::Yahoo) => Effect::OpenDetached(yahoo_url(mail)),
        (ParameterBundle::Tel(tel), Action::Telegram) => {
            let url = telegram_url(tel).ok_or(Error::ActionUnavailable { action, kind })?;
            Effect::OpenDetached(url)
        }
        (ParameterBundle::Tel(tel), Action::WhatsApp) => Effect::OpenDetached(whatsapp_url(tel)),
        (ParameterBundle::Tel(tel), Action::Skype) => Effect::OpenDetached(skype_url(tel)),
        _ => return Err(Error::ActionUnavailable { action, kind }),
    };
    tracing::debug!(%action, ?effect, "planned dispatch");
    Ok(effect)
}

fn open_default(session: &Session) -> Result<Effect> {
    if session.active.mode == InstallMode::Classic
        && let Some(href) = session.href.as_deref()
    {
        return Ok(Effect::Navigate(href.to_string()));
    }

    let url = match &session.bundle {
        ParameterBundle::Mail(mail) => format!("{MAILTO}{}", mail.decoded_address()?),
        ParameterBundle::Tel(tel) if session.active.kind == ContactKind::Sms => {
            let mut url = format!("{SMS}{}", tel.phone);
            if let Some(message) = &tel.message {
                url.push_str("?body=");
                url.push_str(&urlencoding::encode(message));
            }
            url
        }
        ParameterBundle::Tel(tel) => format!("{TEL}{}", tel.phone),
    };
    Ok(Effect::Navigate(url))
}

#[must_use]
pub fn gmail_url(mail: &MailBundle) -> String {
    format!("{GMAIL_COMPOSE}{}", urlencoding::encode(&mail.mailto_url))
}

#[must_use]
pub fn outlook_url(mail: &MailBundle) -> String {
    let mut url = format!("{OUTLOOK_COMPOSE}{}", urlencoding::encode(&mail.address));
    append_subject_body(&mut url, mail);
    url
}

#[must_use]
pub fn yahoo_url(mail: &MailBundle) -> String {
    let mut url = format!("{YAHOO_COMPOSE}{}", urlencoding::encode(&mail.address));
    append_subject_body(&mut url, mail);
    url
}

fn append_subject_body(url: &mut String, mail: &MailBundle) {
    if let Some(subject) = &mail.subject {
        url.push_str("&subject=");
        url.push_str(&urlencoding::encode(subject));
    }
    if let Some(body) = &mail.body {
        url.push_str("&body=");
        url.push_str(&urlencoding::encode(body));
    }
}

/// `None` when no Telegram handle was extracted.
#[must_use]
pub fn telegram_url(tel: &TelBundle) -> Option<String> {
    let handle = tel.telegram.as_deref()?;
    let handle = handle.trim().trim_start_matches('@');
    Some(format!("{TELEGRAM_BASE}{}", urlencoding::encode(handle)))
}

/// The message goes in unencoded; wa.me expects it that way.
#[must_use]
pub fn whatsapp_url(tel: &TelBundle) -> String {
    let mut url = format!("{WHATSAPP_BASE}{}", urlencoding::encode(&tel.phone));
    if let Some(message) = &tel.message {
        url.push_str("?text=");
        url.push_str(message);
    }
    url
}

#[must_use]
pub fn skype_url(tel: &TelBundle) -> String {
    let target = tel.skype.as_deref().unwrap_or(&tel.phone);
    format!("{SKYPE_SCHEME}{}", urlencoding::encode(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ActiveMatch;
    use crate::config::Settings;
    use crate::extract::extract_from_url;

    fn session_for(url: &str) -> Session {
        let (active, bundle) = extract_from_url(url, &Settings::default()).unwrap();
        Session::new(active, bundle, Some(url.to_string()), false)
    }

    fn tel_session(mode: InstallMode, tel: TelBundle) -> Session {
        Session::new(
            ActiveMatch::new(ContactKind::Tel, mode),
            ParameterBundle::Tel(tel),
            None,
            false,
        )
    }

    fn tel_bundle() -> TelBundle {
        TelBundle {
            phone: "+1 555 1234".into(),
            message: Some("hi there".into()),
            telegram: None,
            skype: None,
        }
    }

    #[test]
    fn action_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
        assert_eq!(Action::from_name("WhatsApp"), Some(Action::WhatsApp));
        assert_eq!(Action::from_name("fax"), None);
    }

    #[test]
    fn gmail_wraps_the_mailto_url() {
        let s = session_for("mailto:a@b.com?subject=Hi");
        assert_eq!(
            plan(Action::Gmail, &s).unwrap(),
            Effect::OpenDetached(
                "https://mail.google.com/mail/?extsrc=mailto&url=mailto%3Aa%40b.com%3Fsubject%3DHi"
                    .into()
            )
        );
    }

    #[test]
    fn outlook_encodes_every_field() {
        let s = session_for("mailto:a@b.com?subject=Hello%20you&body=A%26B");
        assert_eq!(
            plan(Action::Outlook, &s).unwrap(),
            Effect::OpenDetached(
                "https://outlook.live.com/owa/?path=/mail/action/compose&to=a%40b.com&subject=Hello%20you&body=A%26B"
                    .into()
            )
        );
    }

    #[test]
    fn yahoo_without_optional_fields() {
        let s = session_for("mailto:a@b.com");
        assert_eq!(
            plan(Action::Yahoo, &s).unwrap(),
            Effect::OpenDetached("https://compose.mail.yahoo.com/?to=a%40b.com".into())
        );
    }

    #[test]
    fn classic_default_navigates_to_the_link_href() {
        let s = session_for("mailto:a@b.com?subject=Hi");
        assert_eq!(
            plan(Action::OpenDefault, &s).unwrap(),
            Effect::Navigate("mailto:a@b.com?subject=Hi".into())
        );
    }

    #[test]
    fn attribute_default_decodes_the_obfuscated_address() {
        let (_, bundle) = extract_from_url("mailto:info@example.com", &Settings::default()).unwrap();
        let s = Session::new(
            ActiveMatch::attribute_based(ContactKind::Mail),
            bundle,
            Some("#mailgo".into()),
            false,
        );
        assert_eq!(
            plan(Action::OpenDefault, &s).unwrap(),
            Effect::Navigate("mailto:info@example.com".into())
        );
    }

    #[test]
    fn attribute_default_for_tel_and_sms() {
        let s = tel_session(InstallMode::AttributeBased, tel_bundle());
        assert_eq!(
            plan(Action::OpenDefault, &s).unwrap(),
            Effect::Navigate("tel:+1 555 1234".into())
        );

        let s = Session::new(
            ActiveMatch::attribute_based(ContactKind::Sms),
            ParameterBundle::Tel(tel_bundle()),
            None,
            false,
        );
        assert_eq!(
            plan(Action::OpenDefault, &s).unwrap(),
            Effect::Navigate("sms:+1 555 1234?body=hi%20there".into())
        );
    }

    #[test]
    fn copy_uses_the_raw_value() {
        let s = session_for("mailto:a@b.com,c@d.org");
        assert_eq!(
            plan(Action::Copy, &s).unwrap(),
            Effect::Copy("a@b.com,c@d.org".into())
        );
        let s = tel_session(InstallMode::Classic, tel_bundle());
        assert_eq!(
            plan(Action::Copy, &s).unwrap(),
            Effect::Copy("+1 555 1234".into())
        );
    }

    #[test]
    fn whatsapp_keeps_message_unencoded() {
        let s = tel_session(InstallMode::Classic, tel_bundle());
        assert_eq!(
            plan(Action::WhatsApp, &s).unwrap(),
            Effect::OpenDetached("https://wa.me/%2B1%20555%201234?text=hi there".into())
        );
    }

    #[test]
    fn telegram_needs_a_handle() {
        let s = tel_session(InstallMode::Classic, tel_bundle());
        assert!(matches!(
            plan(Action::Telegram, &s),
            Err(Error::ActionUnavailable { .. })
        ));

        let s = tel_session(
            InstallMode::AttributeBased,
            TelBundle {
                telegram: Some("joe".into()),
                ..tel_bundle()
            },
        );
        assert_eq!(
            plan(Action::Telegram, &s).unwrap(),
            Effect::OpenDetached("https://t.me/joe".into())
        );
    }

    #[test]
    fn skype_prefers_the_handle() {
        let s = tel_session(InstallMode::Classic, tel_bundle());
        assert_eq!(
            plan(Action::Skype, &s).unwrap(),
            Effect::OpenDetached("skype:%2B1%20555%201234".into())
        );
        let s = tel_session(
            InstallMode::Classic,
            TelBundle {
                skype: Some("joe.s".into()),
                ..tel_bundle()
            },
        );
        assert_eq!(
            plan(Action::Skype, &s).unwrap(),
            Effect::OpenDetached("skype:joe.s".into())
        );
    }

    #[test]
    fn cross_kind_actions_are_rejected() {
        let mail = session_for("mailto:a@b.com");
        assert!(matches!(
            plan(Action::WhatsApp, &mail),
            Err(Error::ActionUnavailable {
                action: Action::WhatsApp,
                kind: ContactKind::Mail
            })
        ));
        let tel = tel_session(InstallMode::Classic, tel_bundle());
        assert!(plan(Action::Gmail, &tel).is_err());
    }
}
