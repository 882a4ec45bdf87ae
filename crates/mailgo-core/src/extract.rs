//! Pulling contact parameters out of a matched link.
//!
//! Classic links are parsed from their href; attribute-based links are read
//! from `data-*` attributes. Validation runs here too, so a bundle that comes
//! out of this module is always safe to render.

use std::borrow::Cow;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use url::{Url, form_urlencoded};

use crate::classify::{
    ActiveMatch, CALLTO, ContactKind, InstallMode, LinkElement, MAILGO, MAILTO, SMS, TEL,
    classify_url, strip_scheme,
};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::validate::{split_address_list, validate_emails, validate_tel};

/// Parameters of a mail match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailBundle {
    /// Comma-separated recipients, exactly as the link gave them.
    pub address: String,
    /// Base64 copy of `address`, decoded only when navigating.
    pub encoded_address: String,
    pub cc: Option<String>,
    pub bcc: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    /// A `mailto:` URL equivalent to the link, handed to webmail intents.
    pub mailto_url: String,
}

impl MailBundle {
    /// Recipients in link order.
    #[must_use]
    pub fn addresses(&self) -> Vec<&str> {
        split_address_list(&self.address)
    }

    pub fn decoded_address(&self) -> Result<String> {
        let bytes = BASE64
            .decode(&self.encoded_address)
            .map_err(|e| Error::AddressDecode(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| Error::AddressDecode(e.to_string()))
    }
}

/// Parameters of a telephone or SMS match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelBundle {
    /// The number as the page wrote it; validated, never reformatted.
    pub phone: String,
    pub message: Option<String>,
    pub telegram: Option<String>,
    pub skype: Option<String>,
}

/// The extracted, validated fields for the current match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParameterBundle {
    Mail(MailBundle),
    Tel(TelBundle),
}

impl ParameterBundle {
    /// The text the copy action puts on the clipboard.
    #[must_use]
    pub fn copy_text(&self) -> &str {
        match self {
            Self::Mail(mail) => &mail.address,
            Self::Tel(tel) => &tel.phone,
        }
    }
}

/// Extracts from a clicked element.
pub fn extract_from_element<E: LinkElement + ?Sized>(
    active: ActiveMatch,
    element: &E,
    settings: &Settings,
) -> Result<ParameterBundle> {
    let href = element.href();
    let view = ElementView(element);
    extract(active, href.as_deref(), Some(&view), settings)
}

/// Extracts from a bare contact URL, for programmatic rendering.
///
/// Only classic URLs are accepted; the match is synthesized from the scheme.
pub fn extract_from_url(url: &str, settings: &Settings) -> Result<(ActiveMatch, ParameterBundle)> {
    let url = url.trim();
    let active = classify_url(url).ok_or_else(|| Error::UnrecognizedUrl(url.to_string()))?;
    let bundle = extract(active, Some(url), None, settings)?;
    Ok((active, bundle))
}

/// Lets unsized elements sit behind `&dyn LinkElement`.
struct ElementView<'a, E: ?Sized>(&'a E);

impl<E: LinkElement + ?Sized> LinkElement for ElementView<'_, E> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.attribute(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.has_class(class)
    }
}

fn extract(
    active: ActiveMatch,
    href: Option<&str>,
    element: Option<&dyn LinkElement>,
    settings: &Settings,
) -> Result<ParameterBundle> {
    let bundle = match (active.kind, active.mode) {
        (ContactKind::Mail, InstallMode::Classic) => {
            mail_from_href(href.ok_or(Error::MissingField("href"))?, settings)?
        }
        (ContactKind::Mail, InstallMode::AttributeBased) => {
            mail_from_attributes(element.ok_or(Error::MissingField("data-address"))?, settings)?
        }
        (ContactKind::Tel | ContactKind::Sms, InstallMode::Classic) => {
            tel_from_href(href.ok_or(Error::MissingField("href"))?, element, settings)?
        }
        (ContactKind::Tel | ContactKind::Sms, InstallMode::AttributeBased) => {
            tel_from_attributes(element.ok_or(Error::MissingField("data-tel"))?, settings)?
        }
    };
    tracing::debug!(
        kind = %active.kind,
        mode = ?active.mode,
        "extracted contact parameters"
    );
    Ok(bundle)
}

// ──────────────────────────────────────────────────────────────────────────────
// Mail
// ──────────────────────────────────────────────────────────────────────────────

fn mail_from_href(href: &str, settings: &Settings) -> Result<ParameterBundle> {
    let (target, query) = split_query(href);
    let raw = strip_scheme(target, MAILTO)
        .or_else(|| strip_scheme(target, MAILGO))
        .ok_or_else(|| Error::UnrecognizedUrl(href.to_string()))?;
    let address = percent_decode(raw).trim().to_string();

    // A URL the parser rejects still yields its address; the optional
    // fields then come from the raw query text.
    let mailto_url = Url::parse(href).map_or_else(|_| href.to_string(), |u| u.to_string());

    let fields = MailFields {
        cc: query_param(query, "cc"),
        bcc: query_param(query, "bcc"),
        subject: query_param(query, "subject"),
        body: query_param(query, "body"),
    };
    finish_mail(address, fields, Some(mailto_url), settings)
}

fn mail_from_attributes(element: &dyn LinkElement, settings: &Settings) -> Result<ParameterBundle> {
    let local = non_empty(element.attribute("data-address"))
        .ok_or(Error::MissingField("data-address"))?;
    let domain =
        non_empty(element.attribute("data-domain")).ok_or(Error::MissingField("data-domain"))?;
    let address = format!("{}@{}", local.trim(), domain.trim());

    let fields = MailFields {
        cc: joined_address(element, "data-cc-address", "data-cc-domain"),
        bcc: joined_address(element, "data-bcc-address", "data-bcc-domain"),
        subject: non_empty(element.attribute("data-subject")),
        body: non_empty(element.attribute("data-body")),
    };
    finish_mail(address, fields, None, settings)
}

struct MailFields {
    cc: Option<String>,
    bcc: Option<String>,
    subject: Option<String>,
    body: Option<String>,
}

fn finish_mail(
    address: String,
    mut fields: MailFields,
    mailto_url: Option<String>,
    settings: &Settings,
) -> Result<ParameterBundle> {
    if address.is_empty() {
        return Err(Error::MissingField("address"));
    }

    if settings.validate_email {
        if !validate_emails(&split_address_list(&address)) {
            return Err(Error::InvalidAddress(address));
        }
        fields.cc = drop_invalid_list("cc", fields.cc);
        fields.bcc = drop_invalid_list("bcc", fields.bcc);
    }

    let mailto_url = mailto_url.unwrap_or_else(|| build_mailto(&address, &fields));
    let encoded_address = BASE64.encode(address.as_bytes());
    Ok(ParameterBundle::Mail(MailBundle {
        address,
        encoded_address,
        cc: fields.cc,
        bcc: fields.bcc,
        subject: fields.subject,
        body: fields.body,
        mailto_url,
    }))
}

fn drop_invalid_list(field: &'static str, list: Option<String>) -> Option<String> {
    let list = list?;
    if validate_emails(&split_address_list(&list)) {
        Some(list)
    } else {
        tracing::warn!(field, value = %list, "dropping invalid address list");
        None
    }
}

/// `local@domain` from a pair of attributes, only when both are present.
fn joined_address(element: &dyn LinkElement, local: &str, domain: &str) -> Option<String> {
    let local = non_empty(element.attribute(local))?;
    let domain = non_empty(element.attribute(domain))?;
    Some(format!("{}@{}", local.trim(), domain.trim()))
}

fn build_mailto(address: &str, fields: &MailFields) -> String {
    let mut url = format!("{MAILTO}{}", urlencoding::encode(address));
    let params = [
        ("cc", fields.cc.as_deref()),
        ("bcc", fields.bcc.as_deref()),
        ("subject", fields.subject.as_deref()),
        ("body", fields.body.as_deref()),
    ];
    let mut sep = '?';
    for (name, value) in params {
        if let Some(value) = value {
            url.push(sep);
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            sep = '&';
        }
    }
    url
}

// ──────────────────────────────────────────────────────────────────────────────
// Tel / SMS
// ──────────────────────────────────────────────────────────────────────────────

fn tel_from_href(
    href: &str,
    element: Option<&dyn LinkElement>,
    settings: &Settings,
) -> Result<ParameterBundle> {
    let (target, query) = split_query(href);
    let (raw, is_sms) = if let Some(rest) = strip_scheme(target, TEL) {
        (rest, false)
    } else if let Some(rest) = strip_scheme(target, CALLTO) {
        (rest, false)
    } else if let Some(rest) = strip_scheme(target, SMS) {
        (rest, true)
    } else {
        return Err(Error::UnrecognizedUrl(href.to_string()));
    };

    let phone = percent_decode(raw).trim().to_string();
    let message = if is_sms {
        query_param(query, "body")
    } else {
        None
    };
    finish_tel(phone, message, element, settings)
}

fn tel_from_attributes(element: &dyn LinkElement, settings: &Settings) -> Result<ParameterBundle> {
    let phone = non_empty(element.attribute("data-tel"))
        .map(|p| p.trim().to_string())
        .ok_or(Error::MissingField("data-tel"))?;
    let message = non_empty(element.attribute("data-msg"));
    finish_tel(phone, message, Some(element), settings)
}

fn finish_tel(
    phone: String,
    message: Option<String>,
    element: Option<&dyn LinkElement>,
    settings: &Settings,
) -> Result<ParameterBundle> {
    if phone.is_empty() {
        return Err(Error::MissingField("phone"));
    }
    if settings.validate_tel && !validate_tel(&phone) {
        return Err(Error::InvalidPhone(phone));
    }

    let handle = |name| element.and_then(|e| non_empty(e.attribute(name)));
    Ok(ParameterBundle::Tel(TelBundle {
        phone,
        message,
        telegram: handle("data-telegram"),
        skype: handle("data-skype"),
    }))
}

// ──────────────────────────────────────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────────────────────────────────────

fn split_query(href: &str) -> (&str, Option<&str>) {
    match href.split_once('?') {
        Some((target, query)) => (target, Some(query)),
        None => (href, None),
    }
}

/// `decodeURIComponent` that keeps the raw text when decoding fails.
fn percent_decode(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), Cow::into_owned)
}

/// First value of `name` in a query string; empty values count as absent.
/// Keys match exactly, as with `URLSearchParams.get`.
fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    let query = query?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
