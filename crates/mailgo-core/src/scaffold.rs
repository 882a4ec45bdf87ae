//! Description of the modal DOM.
//!
//! The core never builds nodes itself. [`modal_skeleton`] describes what a
//! host surface must create once per modal group, and [`modal_view`] describes
//! what to fill in for each opening. Identifiers and classes here are a public
//! contract for page stylesheets.

use serde::Serialize;

use crate::config::Settings;
use crate::dispatch::Action;
use crate::extract::ParameterBundle;
use crate::i18n::{Label, Strings};
use crate::session::{ModalGroup, Session};
use crate::validate::split_address_list;

pub const MAIL_MODAL_ID: &str = "mailgo";
pub const TEL_MODAL_ID: &str = "mailgo-tel";
pub const STYLE_ID: &str = "mailgo-style";

pub const MODAL_CLASS: &str = "m-modal";
pub const BACKGROUND_CLASS: &str = "m-modal-back";
pub const CONTENT_CLASS: &str = "m-modal-content";
pub const TITLE_CLASS: &str = "m-title";
pub const DETAILS_CLASS: &str = "m-details";
pub const STRONG_CLASS: &str = "w-500";
/// Added to the container while dark mode is on.
pub const DARK_MODAL_CLASS: &str = "m-dark";
pub const FOOTER_CLASS: &str = "m-by";

pub const FOOTER_URL: &str = "https://mailgo.dev?ref=mailgo-modal";
pub const FOOTER_TEXT: &str = "mailgo.dev";

#[must_use]
pub const fn container_id(group: ModalGroup) -> &'static str {
    match group {
        ModalGroup::Mail => MAIL_MODAL_ID,
        ModalGroup::Tel => TEL_MODAL_ID,
    }
}

#[must_use]
pub const fn title_id(group: ModalGroup) -> &'static str {
    match group {
        ModalGroup::Mail => "m-title",
        ModalGroup::Tel => "m-tel-title",
    }
}

#[must_use]
pub const fn details_id(group: ModalGroup) -> &'static str {
    match group {
        ModalGroup::Mail => "m-details",
        ModalGroup::Tel => "m-tel-details",
    }
}

#[must_use]
pub const fn copy_button_id(group: ModalGroup) -> &'static str {
    match group {
        ModalGroup::Mail => "m-copy",
        ModalGroup::Tel => "m-tel-copy",
    }
}

/// Optional detail rows under the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailRow {
    Cc,
    Bcc,
    Subject,
    Body,
    Message,
}

impl DetailRow {
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Cc => "m-cc",
            Self::Bcc => "m-bcc",
            Self::Subject => "m-subject",
            Self::Body => "m-body",
            Self::Message => "m-msg",
        }
    }

    #[must_use]
    pub const fn value_id(self) -> &'static str {
        match self {
            Self::Cc => "m-cc-value",
            Self::Bcc => "m-bcc-value",
            Self::Subject => "m-subject-value",
            Self::Body => "m-body-value",
            Self::Message => "m-msg-value",
        }
    }

    const fn label(self) -> Label {
        match self {
            Self::Cc => Label::Cc,
            Self::Bcc => Label::Bcc,
            Self::Subject => Label::Subject,
            Self::Body | Self::Message => Label::Body,
        }
    }

    #[must_use]
    pub const fn rows_for(group: ModalGroup) -> &'static [Self] {
        match group {
            ModalGroup::Mail => &[Self::Cc, Self::Bcc, Self::Subject, Self::Body],
            ModalGroup::Tel => &[Self::Message],
        }
    }
}

/// A run of label text; strong parts are wrapped in `span.w-500`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum LabelPart {
    Plain(&'static str),
    Strong(&'static str),
}

impl LabelPart {
    #[must_use]
    pub const fn text(&self) -> &'static str {
        match self {
            Self::Plain(t) | Self::Strong(t) => t,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSpec {
    pub row: DetailRow,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonSpec {
    pub action: Action,
    pub id: &'static str,
    pub href: &'static str,
    pub classes: &'static [&'static str],
    pub label: Vec<LabelPart>,
    pub initially_hidden: bool,
}

impl ButtonSpec {
    /// The label as plain text, for hosts that do not style parts.
    #[must_use]
    pub fn label_text(&self) -> String {
        self.label.iter().map(LabelPart::text).collect()
    }
}

/// Everything needed to build one modal container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalSkeleton {
    pub group: ModalGroup,
    pub id: &'static str,
    pub title_id: &'static str,
    pub details_id: &'static str,
    pub rows: Vec<RowSpec>,
    pub buttons: Vec<ButtonSpec>,
    pub show_footer: bool,
}

impl ModalSkeleton {
    #[must_use]
    pub fn button(&self, action: Action) -> Option<&ButtonSpec> {
        self.buttons.iter().find(|b| b.action == action)
    }
}

/// Describes the modal for `group`. Disabled actions get no button.
#[must_use]
pub fn modal_skeleton(group: ModalGroup, strings: &Strings, settings: &Settings) -> ModalSkeleton {
    let rows = DetailRow::rows_for(group)
        .iter()
        .map(|&row| RowSpec {
            row,
            label: strings.get(row.label()),
        })
        .collect();

    let buttons = match group {
        ModalGroup::Mail => vec![
            open_in_button(strings, Action::Gmail, "m-gmail", &["m-open", "m-gmail"], Label::Gmail),
            open_in_button(
                strings,
                Action::Outlook,
                "m-outlook",
                &["m-open", "m-outlook"],
                Label::Outlook,
            ),
            open_in_button(strings, Action::Yahoo, "m-yahoo", &["m-open", "m-yahoo"], Label::Yahoo),
            default_button(strings, "m-open", Label::Open, Label::DefaultSuffix),
            copy_button(strings, group),
        ],
        ModalGroup::Tel => vec![
            ButtonSpec {
                initially_hidden: true,
                ..open_in_button(
                    strings,
                    Action::Telegram,
                    "m-tg",
                    &["m-open", "m-tg"],
                    Label::Telegram,
                )
            },
            open_in_button(strings, Action::WhatsApp, "m-wa", &["m-open", "m-wa"], Label::WhatsApp),
            open_in_button(strings, Action::Skype, "m-skype", &["m-open", "m-skype"], Label::Skype),
            default_button(strings, "m-call", Label::Call, Label::AsDefaultSuffix),
            copy_button(strings, group),
        ],
    };

    ModalSkeleton {
        group,
        id: container_id(group),
        title_id: title_id(group),
        details_id: details_id(group),
        rows,
        buttons: buttons
            .into_iter()
            .filter(|b| settings.action_enabled(b.action))
            .collect(),
        show_footer: settings.show_footer,
    }
}

/// "open in **Name**", with the href derived from the action name.
fn open_in_button(
    strings: &Strings,
    action: Action,
    id: &'static str,
    classes: &'static [&'static str],
    name: Label,
) -> ButtonSpec {
    ButtonSpec {
        action,
        id,
        href: action_href(action),
        classes,
        label: vec![
            LabelPart::Plain(strings.get(Label::OpenIn)),
            LabelPart::Strong(strings.get(name)),
        ],
        initially_hidden: false,
    }
}

/// `#mailgo-<name>`; the default action uses `#mailgo-open`.
#[must_use]
pub const fn action_href(action: Action) -> &'static str {
    match action {
        Action::Gmail => "#mailgo-gmail",
        Action::Outlook => "#mailgo-outlook",
        Action::Yahoo => "#mailgo-yahoo",
        Action::Telegram => "#mailgo-telegram",
        Action::WhatsApp => "#mailgo-whatsapp",
        Action::Skype => "#mailgo-skype",
        Action::Copy => "#mailgo-copy",
        Action::OpenDefault => "#mailgo-open",
    }
}

fn default_button(strings: &Strings, id: &'static str, verb: Label, suffix: Label) -> ButtonSpec {
    ButtonSpec {
        action: Action::OpenDefault,
        id,
        href: action_href(Action::OpenDefault),
        classes: &["m-open", "m-default"],
        label: vec![
            LabelPart::Strong(strings.get(verb)),
            LabelPart::Plain(strings.get(suffix)),
        ],
        initially_hidden: false,
    }
}

fn copy_button(strings: &Strings, group: ModalGroup) -> ButtonSpec {
    ButtonSpec {
        action: Action::Copy,
        id: copy_button_id(group),
        href: action_href(Action::Copy),
        classes: &["m-copy", STRONG_CLASS],
        label: vec![LabelPart::Plain(strings.get(Label::Copy))],
        initially_hidden: false,
    }
}

/// Per-opening content: title lines, detail rows and Telegram visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub group: ModalGroup,
    /// One line per recipient for mail, the number for tel.
    pub title_lines: Vec<String>,
    /// Every row of the group; `None` hides the row.
    pub rows: Vec<(DetailRow, Option<Vec<String>>)>,
    pub show_telegram: bool,
}

impl ModalView {
    #[must_use]
    pub fn row(&self, row: DetailRow) -> Option<&[String]> {
        self.rows
            .iter()
            .find(|(r, _)| *r == row)
            .and_then(|(_, lines)| lines.as_deref())
    }
}

/// Builds the view for the session's bundle. Every row is listed so a host
/// can hide rows left over from a previous opening.
#[must_use]
pub fn modal_view(session: &Session) -> ModalView {
    let lines = |list: &str| -> Vec<String> {
        split_address_list(list)
            .into_iter()
            .map(str::to_string)
            .collect()
    };
    let text = |value: &Option<String>| value.as_ref().map(|v| vec![v.clone()]);

    match &session.bundle {
        ParameterBundle::Mail(mail) => ModalView {
            group: ModalGroup::Mail,
            title_lines: lines(&mail.address),
            rows: vec![
                (DetailRow::Cc, mail.cc.as_deref().map(lines)),
                (DetailRow::Bcc, mail.bcc.as_deref().map(lines)),
                (DetailRow::Subject, text(&mail.subject)),
                (DetailRow::Body, text(&mail.body)),
            ],
            show_telegram: false,
        },
        ParameterBundle::Tel(tel) => ModalView {
            group: ModalGroup::Tel,
            title_lines: vec![tel.phone.clone()],
            rows: vec![(DetailRow::Message, text(&tel.message))],
            show_telegram: tel.telegram.is_some(),
        },
    }
}
