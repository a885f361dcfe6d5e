use thiserror::Error;

pub const DEFAULT_LINE_BREAK: &str = "<br>";
pub const DEFAULT_CONNECTORS: [&str; 3] = ["&", "and", "和"];

/// Presentation knobs for [`crate::EntryFormatter`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormatOptions {
    /// Marker placed between sense lines.
    pub line_break: String,
    /// When set, display tags are wrapped in `<span class="...">`.
    pub tag_class: Option<String>,
    pub connectors: Vec<String>,
    /// Fill an empty sense with a sibling's text. This can duplicate one
    /// sense's gloss under an unrelated tag.
    pub borrow_empty_text: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("line break marker must not be empty")]
    EmptyLineBreak,
    #[error("invalid tag class {0:?}: use ASCII letters, digits, '-' or '_'")]
    InvalidTagClass(String),
    #[error("connector list must contain at least one token")]
    EmptyConnectors,
    #[error("invalid boolean {0:?}")]
    InvalidBool(String),
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            line_break: DEFAULT_LINE_BREAK.to_string(),
            tag_class: None,
            connectors: DEFAULT_CONNECTORS.iter().map(|c| c.to_string()).collect(),
            borrow_empty_text: true,
        }
    }
}

impl FormatOptions {
    pub fn with_line_break(mut self, marker: &str) -> Result<Self, OptionsError> {
        if marker.is_empty() {
            return Err(OptionsError::EmptyLineBreak);
        }
        self.line_break = marker.to_string();
        Ok(self)
    }

    pub fn with_tag_class(mut self, class: &str) -> Result<Self, OptionsError> {
        let class = class.trim();
        let valid = !class.is_empty()
            && class
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(OptionsError::InvalidTagClass(class.to_string()));
        }
        self.tag_class = Some(class.to_string());
        Ok(self)
    }

    /// Replace the connector tokens with a comma separated list.
    pub fn with_connectors(mut self, raw: &str) -> Result<Self, OptionsError> {
        let tokens: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if tokens.is_empty() {
            return Err(OptionsError::EmptyConnectors);
        }
        self.connectors = tokens;
        Ok(self)
    }

    pub fn with_borrow_empty_text(mut self, borrow: bool) -> Self {
        self.borrow_empty_text = borrow;
        self
    }

    /// Render a display tag, wrapped when a tag class is configured.
    pub fn markup_tag(&self, tag: &str) -> String {
        match &self.tag_class {
            Some(class) => format!(r#"<span class="{class}">{tag}</span>"#),
            None => tag.to_string(),
        }
    }
}

/// Parse the boolean spellings accepted in environment variables.
pub fn parse_bool(raw: &str) -> Result<bool, OptionsError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(OptionsError::InvalidBool(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_source_rendering() {
        let opts = FormatOptions::default();
        assert_eq!(opts.line_break, "<br>");
        assert!(opts.borrow_empty_text);
        assert_eq!(opts.connectors, vec!["&", "and", "和"]);
        assert_eq!(opts.markup_tag("n."), "n.");
    }

    #[test]
    fn wraps_tags_in_span_when_classed() {
        let opts = FormatOptions::default().with_tag_class("pos-tag").unwrap();
        assert_eq!(opts.markup_tag("v. & aux."), r#"<span class="pos-tag">v. & aux.</span>"#);
    }

    #[test]
    fn rejects_invalid_values() {
        let opts = FormatOptions::default();
        assert_eq!(
            opts.clone().with_line_break(""),
            Err(OptionsError::EmptyLineBreak)
        );
        assert!(matches!(
            opts.clone().with_tag_class("a\"b"),
            Err(OptionsError::InvalidTagClass(_))
        ));
        assert_eq!(
            opts.with_connectors(" , ,"),
            Err(OptionsError::EmptyConnectors)
        );
    }

    #[test]
    fn parses_connector_lists() {
        let opts = FormatOptions::default().with_connectors("&, plus ,/").unwrap();
        assert_eq!(opts.connectors, vec!["&", "plus", "/"]);
    }

    #[test]
    fn parses_bools() {
        assert_eq!(parse_bool("TRUE"), Ok(true));
        assert_eq!(parse_bool(" off "), Ok(false));
        assert!(parse_bool("maybe").is_err());
    }
}
