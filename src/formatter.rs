//! Pure message-to-task formatting: titles, HTML notes, permalinks.
//!
//! No I/O happens here. Every function is deterministic given its
//! inputs, which keeps the whole transformation testable without a
//! network.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::author::Author;
use crate::models::context::{Context, ContextKind};
use crate::models::item::Message;

/// Hard upper bound on a trimmed title, in characters.
const TITLE_LIMIT: usize = 80;

const ELLIPSIS: &str = "...";

/// Mention tokens as they appear in a conversation purpose.
const TAGGED_NAME_PATTERN: &str = "@[A-Za-z0-9]+[!A-Za-z0-9]";

#[allow(clippy::expect_used)] // pattern is a compile-time constant
fn tagged_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TAGGED_NAME_PATTERN).expect("valid mention pattern"))
}

/// Render the canonical task title: `"<author> text"`.
///
/// The same rendering applies to every conversation kind.
#[must_use]
pub fn build_title(message: &Message, author: &Author) -> String {
    format!("<{}> {}", author.name, message.text)
}

/// First line of the title, truncated to at most 80 characters.
///
/// A line of 80 or more characters is cut to its first 77 and suffixed
/// with `"..."`, yielding exactly 80. Counted in characters, so a
/// multi-byte scalar is never split.
#[must_use]
pub fn build_trimmed_title(message: &Message, author: &Author) -> String {
    let title = build_title(message, author);
    let line = title.split('\n').next().unwrap_or_default();

    if line.chars().count() < TITLE_LIMIT {
        return line.to_owned();
    }

    let kept: String = line.chars().take(TITLE_LIMIT - ELLIPSIS.len()).collect();
    format!("{kept}{ELLIPSIS}")
}

/// Render the HTML notes fragment for a task.
///
/// The fragment carries the escaped title, a context line that depends on
/// the conversation kind (nothing for a direct message, the mention set
/// for a group direct message, `In #name` for a channel), and an anchor
/// wrapping the permalink. Every interpolated string is escaped first so
/// message content cannot break the markup.
#[must_use]
pub fn build_notes(
    message: &Message,
    author: &Author,
    context: &Context,
    permalink: &str,
) -> String {
    let title = escape(&build_title(message, author));
    let link = escape(permalink);

    match context.kind {
        ContextKind::DirectMessage => {
            format!("<body>{title}\n\n<a href=\"{link}\">{link}</a></body>")
        }
        ContextKind::GroupDirectMessage => {
            let mentions = escape(&tagged_names_list(&context.purpose));
            format!("<body>{title}\n\nIn {mentions}\n\n<a href=\"{link}\">{link}</a></body>")
        }
        ContextKind::Channel => {
            let name = escape(&context.name);
            format!("<body>{title}\n\nIn #{name}\n\n<a href=\"{link}\">{link}</a></body>")
        }
    }
}

/// Permalink for a starred message.
///
/// Prefers the link the source already supplied; otherwise builds the
/// archive URL from the team domain, channel id, and the ts token with
/// its dots stripped (the token's decimal point is not part of the URL
/// segment).
#[must_use]
pub fn permalink(message: &Message, channel: &str, team_domain: &str) -> String {
    if let Some(link) = message.permalink.as_deref() {
        if !link.is_empty() {
            return link.to_owned();
        }
    }

    format!(
        "https://{team_domain}.slack.com/archives/{channel}/p{}",
        message.ts.replace('.', "")
    )
}

/// All `@handle` tokens found in a purpose text, in order of appearance.
#[must_use]
pub fn tagged_names(purpose: &str) -> Vec<&str> {
    tagged_name_re()
        .find_iter(purpose)
        .map(|found| found.as_str())
        .collect()
}

/// Mention set rendered as `{@a,@b}`.
#[must_use]
pub fn tagged_names_list(purpose: &str) -> String {
    format!("{{{}}}", tagged_names(purpose).join(","))
}

/// Escape the characters that would break the notes markup.
///
/// Only `<`, `>`, and `"` are rewritten; all other characters pass
/// through untouched.
#[must_use]
pub fn escape(input: &str) -> String {
    input
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
