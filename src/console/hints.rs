use colored::{Color, ColoredString, Colorize};

use crate::error::{LoggerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Bold,
    Dimmed,
    Italic,
    Underline,
    Reverse,
}

impl Attribute {
    fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "bold" => Ok(Attribute::Bold),
            "dimmed" | "dark" => Ok(Attribute::Dimmed),
            "italic" => Ok(Attribute::Italic),
            "underline" => Ok(Attribute::Underline),
            "reverse" => Ok(Attribute::Reverse),
            other => Err(LoggerError::InvalidConfiguration(format!("unknown text attribute `{}`", other))),
        }
    }
}

/// Console styling for a group's header. Carries no meaning for the metrics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayHints {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub attributes: Vec<Attribute>,
}

impl DisplayHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds hints from color names such as `("white", "on_blue", ["bold"])`.
    /// The `on_` prefix of the background is optional.
    pub fn parse(foreground: Option<&str>, background: Option<&str>, attributes: &[&str]) -> Result<Self> {
        let foreground = foreground.map(parse_color).transpose()?;
        let background = background
            .map(|name| parse_color(name.strip_prefix("on_").unwrap_or(name)))
            .transpose()?;
        let attributes = attributes.iter().map(|a| Attribute::parse(a)).collect::<Result<Vec<_>>>()?;
        Ok(Self { foreground, background, attributes })
    }

    pub fn paint(&self, text: &str) -> ColoredString {
        let mut out: ColoredString = text.normal();
        if let Some(color) = self.foreground {
            out = out.color(color);
        }
        if let Some(color) = self.background {
            out = out.on_color(color);
        }
        for attr in &self.attributes {
            out = match attr {
                Attribute::Bold => out.bold(),
                Attribute::Dimmed => out.dimmed(),
                Attribute::Italic => out.italic(),
                Attribute::Underline => out.underline(),
                Attribute::Reverse => out.reversed(),
            };
        }
        out
    }
}

fn parse_color(name: &str) -> Result<Color> {
    name.replace('_', " ")
        .parse::<Color>()
        .map_err(|_| LoggerError::InvalidConfiguration(format!("unknown color `{}`", name)))
}
