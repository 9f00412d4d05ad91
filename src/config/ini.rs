//! Flat INI document that keeps every line it does not own.
//!
//! Lookup follows the Windows profile API: section and key names match
//! without regard to case, the first match wins, lines starting with `;`
//! or `#` are comments, and anything unreadable is skipped.

/// Parsed INI text, line for line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniDocument {
    lines: Vec<String>,
    newline: &'static str,
}

impl Default for IniDocument {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            newline: "\r\n",
        }
    }
}

/// What a single line holds
enum Line<'a> {
    Section(&'a str),
    Entry { key: &'a str, value: &'a str },
    Other,
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
        return Line::Other;
    }
    if let Some(name) = trimmed.strip_prefix('[') {
        return name
            .find(']')
            .map_or(Line::Other, |end| Line::Section(name[..end].trim()));
    }
    match trimmed.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Line::Entry {
            key: key.trim(),
            value: value.trim(),
        },
        _ => Line::Other,
    }
}

/// Remove one pair of matching surrounding quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

impl IniDocument {
    /// Parse `text`; never fails, unreadable lines are kept but ignored
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let newline = if text.contains("\r\n") || text.is_empty() {
            "\r\n"
        } else {
            "\n"
        };
        Self {
            lines: text.lines().map(str::to_owned).collect(),
            newline,
        }
    }

    /// Value of `key` in `section`, quotes removed
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let mut in_section = false;
        for line in &self.lines {
            match classify(line) {
                Line::Section(name) => in_section = name.eq_ignore_ascii_case(section),
                Line::Entry { key: k, value } if in_section && k.eq_ignore_ascii_case(key) => {
                    return Some(unquote(value));
                }
                _ => {}
            }
        }
        None
    }

    /// Set `key` in `section`, rewriting the existing line in place.
    ///
    /// A missing key is added at the end of its section; a missing section
    /// is appended to the document.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let mut in_section = false;
        let mut section_end = None;
        let mut existing = None;

        for (index, line) in self.lines.iter().enumerate() {
            match classify(line) {
                Line::Section(name) => {
                    if in_section {
                        break;
                    }
                    in_section = name.eq_ignore_ascii_case(section);
                    if in_section {
                        section_end = Some(index + 1);
                    }
                }
                Line::Entry { key: k, .. } if in_section => {
                    if k.eq_ignore_ascii_case(key) {
                        existing = Some((index, k.to_owned()));
                        break;
                    }
                    section_end = Some(index + 1);
                }
                Line::Other if in_section && !line.trim().is_empty() => {
                    section_end = Some(index + 1);
                }
                _ => {}
            }
        }

        if let Some((index, written_key)) = existing {
            self.lines[index] = format!("{written_key}={value}");
            return;
        }

        let entry = format!("{key}={value}");
        if let Some(at) = section_end {
            self.lines.insert(at, entry);
        } else {
            if self.lines.last().is_some_and(|line| !line.trim().is_empty()) {
                self.lines.push(String::new());
            }
            self.lines.push(format!("[{section}]"));
            self.lines.push(entry);
        }
    }

    /// Text to write back, ending with a newline
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push_str(self.newline);
        }
        out
    }
}

/// Leading decimal integer, the way `GetPrivateProfileInt` reads values
#[must_use]
pub fn leading_int(value: &str) -> Option<u32> {
    let value = value.trim_start();
    let digits = value.len() - value.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    value[..digits].parse().ok()
}

/// Lenient boolean
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
