//! Framing of `text/event-stream` bodies into named events.

const DEFAULT_EVENT: &str = "message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub event: String,
    pub data: String,
}

/// Collects the lines of one event until the blank line that ends it.
#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    event: Option<String>,
    data: Vec<String>,
}

impl EventStreamDecoder {
    /// Feeds one line without its line terminator. Returns a frame when the
    /// line completes an event that carried data.
    pub fn push_line(&mut self, line: &str) -> Option<Frame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_owned()),
            "data" => self.data.push(value.to_owned()),
            // id and retry only matter for reconnecting
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<Frame> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = self.data.join("\n");
        self.data.clear();
        Some(Frame {
            event: event.unwrap_or_else(|| DEFAULT_EVENT.to_owned()),
            data,
        })
    }
}
