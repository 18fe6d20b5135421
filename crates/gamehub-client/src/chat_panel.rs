use web_sys::{Document, Element, HtmlInputElement};

use gamehub_core::chat::{ChatRole, ChatTranscript};

use crate::diag;
use crate::dom::{element, typed};

const PENDING_TEXT: &str = "Thinking…";

fn role_class(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "chat-message chat-user",
        ChatRole::Assistant => "chat-message chat-assistant",
        ChatRole::Error => "chat-message chat-error",
    }
}

/// Message log and input of the assistant view.
pub struct ChatPanel {
    document: Document,
    log: Element,
    input: HtmlInputElement,
    send: Element,
}

impl ChatPanel {
    pub fn bind(document: &Document) -> Result<Self, String> {
        Ok(Self {
            document: document.clone(),
            log: element(document, "chat-log")?,
            input: typed(document, "chat-input")?,
            send: element(document, "chat-send")?,
        })
    }

    pub fn input(&self) -> &HtmlInputElement {
        &self.input
    }

    pub fn send_button(&self) -> &Element {
        &self.send
    }

    /// Take the typed text, leaving the input empty.
    pub fn take_input(&self) -> String {
        let text = self.input.value();
        self.input.set_value("");
        text
    }

    pub fn render(&self, transcript: &ChatTranscript) {
        self.log.set_inner_html("");
        for entry in transcript.entries() {
            self.append(role_class(entry.role), &entry.text);
        }
        if transcript.is_pending() {
            self.append("chat-message chat-pending", PENDING_TEXT);
        }
        self.input.set_disabled(transcript.is_pending());
        if transcript.is_pending() {
            let _ = self.send.set_attribute("disabled", "");
        } else {
            let _ = self.send.remove_attribute("disabled");
        }
        self.log.set_scroll_top(self.log.scroll_height());
    }

    fn append(&self, class: &str, text: &str) {
        let line = match self.document.create_element("div") {
            Ok(line) => line,
            Err(e) => {
                diag::console_warn!("Failed to create chat line: {e:?}");
                return;
            },
        };
        line.set_class_name(class);
        line.set_text_content(Some(text));
        if let Err(e) = self.log.append_child(&line) {
            diag::console_warn!("Failed to append chat line: {e:?}");
        }
    }
}
