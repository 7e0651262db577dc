//! Line-oriented transport.
//!
//! A client speaks newline-delimited UTF-8. The first line is the hello:
//!
//! ```text
//! <display name> [<public key, hex>]
//! ```
//!
//! Every later line is either a slash command or text:
//!
//! | line                | event                          |
//! |---------------------|--------------------------------|
//! | `/tab`              | toggle mode                    |
//! | `/up`, `/down`      | move the selection             |
//! | `/upvote`, `/downvote`, `/vote up\|down` | vote      |
//! | `/size W H`         | viewport resize                |
//! | `/quit`             | disconnect                     |
//! | `//text`            | text starting with `/`         |
//! | anything else       | submitted text in input mode, keys in selection mode |
//!
//! In input mode a text line is submitted whole, so over-long text reaches the
//! service and is rejected with a notice. In selection mode the characters go
//! through [`InputState`], so a bare `u` or `d` votes exactly as the key would.

use std::collections::VecDeque;

use agora_app::{Driver, InputState, KeyInput, KeyOutcome, Mode, SessionEvent, SessionView};
use agora_core::Identity;
use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

use crate::{error::LineDriverError, render::render_frame};

/// Greeting sent before the hello line is read.
pub const GREETING: &str = "agora: enter your name\n";

/// Driver over a pair of byte streams carrying text lines.
pub struct LineDriver<R, W> {
    lines: FramedRead<R, LinesCodec>,
    writer: W,
    input: InputState,
    pending: VecDeque<SessionEvent>,
    max_line_bytes: usize,
}

impl<R, W> LineDriver<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Greet the client and read its hello line.
    ///
    /// Returns `None` if the client hung up before saying hello.
    pub async fn handshake(
        reader: R,
        mut writer: W,
        max_line_bytes: usize,
    ) -> Result<Option<(Self, Identity)>, LineDriverError> {
        writer.write_all(GREETING.as_bytes()).await?;
        writer.flush().await?;

        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(max_line_bytes));
        let Some(hello) = lines.next().await else {
            return Ok(None);
        };
        let identity = parse_hello(&hello.map_err(|e| codec_error(e, max_line_bytes))?)?;

        let driver = Self {
            lines,
            writer,
            input: InputState::new(),
            pending: VecDeque::new(),
            max_line_bytes,
        };
        Ok(Some((driver, identity)))
    }

    async fn reply(&mut self, text: &str) -> Result<(), LineDriverError> {
        self.writer.write_all(format!("? {text}\n").as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

impl<R, W> Driver for LineDriver<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    type Error = LineDriverError;

    /// Cancel safe up to the reply for an unknown command, which may be cut
    /// short. Lines already read stay queued.
    async fn next_event(&mut self, mode: Mode) -> Result<Option<SessionEvent>, Self::Error> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }

            let line = match self.lines.next().await {
                None => return Ok(None),
                Some(Ok(line)) => line,
                Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                    let max = self.max_line_bytes;
                    tracing::debug!(max, "dropping over-long line");
                    self.reply(&format!("line longer than {max} bytes dropped")).await?;
                    continue;
                },
                Some(Err(LinesCodecError::Io(e))) => return Err(e.into()),
            };

            match decode_line(&line, mode, &mut self.input) {
                Ok(events) => self.pending.extend(events),
                Err(unknown) => self.reply(&format!("unknown command {unknown}")).await?,
            }
        }
    }

    async fn render(&mut self, view: &SessionView<'_>) -> Result<(), Self::Error> {
        let frame = render_frame(view);
        self.writer.write_all(frame.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    fn stop(&mut self) {
        self.pending.clear();
    }
}

/// Parse the hello line into an identity.
///
/// A blank hello connects as [`Identity::anonymous`].
pub fn parse_hello(line: &str) -> Result<Identity, LineDriverError> {
    let mut parts = line.split_whitespace();
    let identity = parts.next().map_or_else(Identity::anonymous, Identity::new);

    match parts.next() {
        None => Ok(identity),
        Some(key) => {
            let key = hex::decode(key)
                .map_err(|e| LineDriverError::Handshake(format!("public key: {e}")))?;
            Ok(identity.with_public_key(&key))
        },
    }
}

/// Turn one line into session events.
///
/// Returns the command word on an unknown slash command.
pub fn decode_line(
    line: &str,
    mode: Mode,
    input: &mut InputState,
) -> Result<Vec<SessionEvent>, String> {
    let line = line.trim_end_matches('\r');

    let text = match line.strip_prefix('/') {
        Some(rest) if rest.starts_with('/') => rest,
        Some(command) => return decode_command(command).map(|e| vec![e]),
        None => line,
    };

    // Sent lines are submitted whole; the editor's length cap does not apply
    if mode == Mode::Input {
        return Ok(vec![SessionEvent::Submit(text.to_string())]);
    }

    let events = text
        .chars()
        .filter_map(|c| match input.handle_key(KeyInput::Char(c), mode) {
            KeyOutcome::Event(event) => Some(event),
            KeyOutcome::Edited | KeyOutcome::Ignored => None,
        })
        .collect();
    Ok(events)
}

fn decode_command(command: &str) -> Result<SessionEvent, String> {
    let mut args = command.split_whitespace();
    let name = args.next().unwrap_or_default();

    let event = match (name, args.next(), args.next()) {
        ("tab" | "mode", None, None) => SessionEvent::ToggleMode,
        ("up", None, None) => SessionEvent::NavigateUp,
        ("down", None, None) => SessionEvent::NavigateDown,
        ("upvote", None, None) | ("vote", Some("up"), None) => SessionEvent::Upvote,
        ("downvote", None, None) | ("vote", Some("down"), None) => SessionEvent::Downvote,
        ("quit" | "exit", None, None) => SessionEvent::Disconnect,
        ("size", Some(w), Some(h)) => match (w.parse(), h.parse()) {
            (Ok(w), Ok(h)) => SessionEvent::Resize(w, h),
            _ => return Err(format!("/{command}")),
        },
        _ => return Err(format!("/{command}")),
    };
    Ok(event)
}

fn codec_error(err: LinesCodecError, max: usize) -> LineDriverError {
    match err {
        LinesCodecError::MaxLineLengthExceeded => LineDriverError::LineTooLong { max },
        LinesCodecError::Io(e) => LineDriverError::Io(e),
    }
}
