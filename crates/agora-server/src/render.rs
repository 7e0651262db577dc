//! Plain-text frame renderer.
//!
//! Turns a [`SessionView`] into the text written to a line client after each
//! render action. Layout, top to bottom:
//!
//! ```text
//! == agora ==
//! [22:13:20] * Welcome to agora
//! [22:13:21] alice: hello [+1 -0]
//! ----
//! Connected as alice | Term unknown | Window 80x24 | Online users 2
//! INPUT  type and press Enter to send | /tab to vote | /quit to leave
//! ! you have already voted up on this message
//! ```
//!
//! In selection mode system messages are hidden and the highlighted message
//! is prefixed with `>`.

use std::{fmt::Write, ops::Range};

use agora_app::{Mode, SessionView};
use agora_core::Message;
use chrono::DateTime;

/// Rows taken by everything except the message list.
const CHROME_ROWS: usize = 5;

/// Frame header line.
pub const FRAME_HEADER: &str = "== agora ==";

/// Render one frame.
pub fn render_frame(view: &SessionView<'_>) -> String {
    let mut out = String::new();
    out.push_str(FRAME_HEADER);
    out.push('\n');

    let selection = view.client.mode == Mode::Selection;
    let rows: Vec<(usize, &Message)> = view
        .snapshot
        .iter()
        .enumerate()
        .filter(|(_, m)| !selection || m.is_votable())
        .collect();

    let focus = view
        .selected()
        .and_then(|_| view.client.selected_index)
        .and_then(|index| rows.iter().position(|(i, _)| *i == index));
    let height = usize::from(view.terminal.height).saturating_sub(CHROME_ROWS).max(1);

    for (index, message) in &rows[visible_window(rows.len(), height, focus)] {
        let marker = match (selection, Some(*index) == view.client.selected_index) {
            (true, true) => "> ",
            (true, false) => "  ",
            (false, _) => "",
        };
        let _ = writeln!(out, "{marker}{}", format_message(message));
    }

    out.push_str("----\n");
    let _ = writeln!(
        out,
        "Connected as {} | Term {} | Window {}x{} | Online users {}",
        view.identity.display_name(),
        view.terminal.term,
        view.terminal.width,
        view.terminal.height,
        view.presence
    );
    out.push_str(match view.client.mode {
        Mode::Input => "INPUT  type and press Enter to send | /tab to vote | /quit to leave\n",
        Mode::Selection => "SELECT  /up /down to move | u or d to vote | /tab to type\n",
    });
    if let Some(notice) = view.notice {
        let _ = writeln!(out, "! {notice}");
    }
    out
}

/// One message line, without selection marker.
pub fn format_message(message: &Message) -> String {
    let time = format_time(message.timestamp_ms);
    if message.is_system {
        format!("[{time}] * {}", message.content)
    } else {
        format!(
            "[{time}] {}: {} [+{} -{}]",
            message.author.display_name(),
            message.content,
            message.upvotes,
            message.downvotes
        )
    }
}

/// `HH:MM:SS` in UTC.
fn format_time(timestamp_ms: u64) -> String {
    i64::try_from(timestamp_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map_or_else(|| "--:--:--".to_string(), |t| t.format("%H:%M:%S").to_string())
}

/// Rows to show out of `len`, at most `height`, ending at `focus` when set
/// and at the newest row otherwise.
fn visible_window(len: usize, height: usize, focus: Option<usize>) -> Range<usize> {
    let end = focus.map_or(len, |f| (f + 1).max(height.min(len)));
    let end = end.min(len);
    end.saturating_sub(height)..end
}
