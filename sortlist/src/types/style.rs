use super::{Border, Rgb, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub background: Option<Rgb>,
    pub foreground: Option<Rgb>,
    pub border: Border,
    pub text_style: TextStyle,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            background: None,
            foreground: None,
            border: Border::None,
            text_style: TextStyle::new(),
        }
    }

    pub const fn background(mut self, color: Rgb) -> Self {
        self.background = Some(color);
        self
    }

    pub const fn foreground(mut self, color: Rgb) -> Self {
        self.foreground = Some(color);
        self
    }

    pub const fn border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    pub const fn text_style(mut self, text_style: TextStyle) -> Self {
        self.text_style = text_style;
        self
    }

    pub const fn bold(mut self) -> Self {
        self.text_style.bold = true;
        self
    }

    pub const fn dim(mut self) -> Self {
        self.text_style.dim = true;
        self
    }
}
