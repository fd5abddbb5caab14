/// Line buffer for chat messages. Rendered with `\n` separators.
#[derive(Debug, Default, Clone)]
pub struct MessageBuilder {
    lines: Vec<String>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line. Empty text is ignored; use [`blank`](Self::blank) for spacing.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            self.lines.push(text.to_string());
        }
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    /// `【title】`, preceded by a blank line unless the buffer is empty.
    pub fn section(&mut self, title: &str) -> &mut Self {
        if !self.lines.is_empty() {
            self.blank();
        }
        self.line(format!("【{}】", title))
    }

    pub fn bullet(&mut self, text: impl AsRef<str>, glyph: &str) -> &mut Self {
        let text = text.as_ref();
        if text.is_empty() {
            return self;
        }
        self.line(format!("{}{}", glyph, text))
    }

    /// Two-space indent, applied to every line of `text`.
    pub fn indent(&mut self, text: impl AsRef<str>) -> &mut Self {
        for line in text.as_ref().lines().filter(|l| !l.trim().is_empty()) {
            self.lines.push(format!("  {}", line));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}
