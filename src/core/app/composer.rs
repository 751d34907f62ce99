use crate::core::message::FileAttachment;

/// What the composer line is currently collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposerMode {
    #[default]
    Message,
    SessionTitle,
    AttachPath,
}

impl ComposerMode {
    pub fn title(self) -> &'static str {
        match self {
            ComposerMode::Message => "Message",
            ComposerMode::SessionTitle => "Session title (Enter to create, Esc to cancel)",
            ComposerMode::AttachPath => "File to attach (Enter to upload, Esc to cancel)",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Composer {
    pub mode: ComposerMode,
    input: String,
    /// Message draft kept aside while a prompt borrows the input line.
    draft: Option<String>,
    pub attachments: Vec<FileAttachment>,
}

impl Composer {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn insert_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn insert_str(&mut self, text: &str) {
        self.input.push_str(text);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    /// Switch to a prompt mode, parking the message draft.
    pub fn begin_prompt(&mut self, mode: ComposerMode) {
        if self.mode == ComposerMode::Message {
            self.draft = Some(self.take_input());
        } else {
            self.input.clear();
        }
        self.mode = mode;
    }

    /// Return to message mode, restoring the parked draft.
    pub fn end_prompt(&mut self) {
        self.mode = ComposerMode::Message;
        self.input = self.draft.take().unwrap_or_default();
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Ids of successfully uploaded attachments.
    pub fn file_ids(&self) -> Vec<String> {
        self.attachments
            .iter()
            .filter_map(|attachment| attachment.file_id.clone())
            .collect()
    }

    pub fn remove_last_attachment(&mut self) -> Option<FileAttachment> {
        self.attachments.pop()
    }

    pub fn chip_labels(&self) -> Vec<String> {
        self.attachments
            .iter()
            .map(FileAttachment::chip_label)
            .collect()
    }
}
