//! SNBT serialization for tagged-value trees.
//!
//! Output is deterministic: compound keys are sorted. Numbers carry their width
//! suffix (`1b`, `2s`, `3`, `4L`, `1.5f`, `2.5d`) so the text parses back to
//! the same kinds with [`crate::parser::parse_compound`]. Non-finite floats
//! print as `NaNf`, `inff` or `-inff` (`d` for doubles), which the parser
//! also reads back.
//!
//! # Examples
//!
//! ```
//! use nbt_query::Compound;
//! use nbt_query::output::{to_snbt, to_snbt_pretty};
//!
//! let mut item = Compound::new();
//! item.set_int("Damage", 10);
//! item.set_string("Name", "Sword");
//!
//! assert_eq!(to_snbt(&item), r#"{Damage:10,Name:"Sword"}"#);
//! assert_eq!(to_snbt_pretty(&item), "{\n  Damage: 10,\n  Name: \"Sword\"\n}");
//! ```

use crate::value::{Compound, Tag};

pub struct SnbtPrinter {
    pretty: bool,
}

impl SnbtPrinter {
    pub fn new(pretty: bool) -> Self {
        SnbtPrinter { pretty }
    }

    pub fn print(&self, tag: &Tag) -> String {
        self.print_tag(tag, 0)
    }

    pub fn print_compound(&self, compound: &Compound) -> String {
        self.compound(compound, 0)
    }

    fn print_tag(&self, tag: &Tag, indent: usize) -> String {
        match tag {
            Tag::Byte(n) => format!("{}b", n),
            Tag::Short(n) => format!("{}s", n),
            Tag::Int(n) => n.to_string(),
            Tag::Long(n) => format!("{}L", n),
            Tag::Float(n) => format!("{}f", n),
            Tag::Double(n) => format!("{}d", n),
            Tag::String(s) => self.quote(s),
            Tag::List(items) => {
                let items: Vec<String> = items
                    .iter()
                    .map(|item| self.print_tag(item, indent + 1))
                    .collect();
                self.sequence("[", &items, "]", indent)
            }
            Tag::Compound(c) => self.compound(c, indent),
            Tag::ByteArray(v) => self.array("B", v.iter().map(|n| format!("{}b", n))),
            Tag::IntArray(v) => self.array("I", v.iter().map(|n| n.to_string())),
            Tag::LongArray(v) => self.array("L", v.iter().map(|n| format!("{}L", n))),
        }
    }

    fn compound(&self, compound: &Compound, indent: usize) -> String {
        // Sort keys for deterministic output
        let mut entries: Vec<_> = compound.iter().collect();
        entries.sort_by_key(|(key, _)| *key);

        let separator = if self.pretty { ": " } else { ":" };
        let items: Vec<String> = entries
            .into_iter()
            .map(|(key, tag)| {
                format!(
                    "{}{}{}",
                    self.key(key),
                    separator,
                    self.print_tag(tag, indent + 1)
                )
            })
            .collect();
        self.sequence("{", &items, "}", indent)
    }

    fn sequence(&self, open: &str, items: &[String], close: &str, indent: usize) -> String {
        if items.is_empty() {
            return format!("{}{}", open, close);
        }

        if self.pretty {
            let inner = self.indent(indent + 1);
            let body: Vec<String> = items.iter().map(|item| format!("{}{}", inner, item)).collect();
            format!("{}\n{}\n{}{}", open, body.join(",\n"), self.indent(indent), close)
        } else {
            format!("{}{}{}", open, items.join(","), close)
        }
    }

    fn array(&self, prefix: &str, items: impl Iterator<Item = String>) -> String {
        let items: Vec<String> = items.collect();
        let separator = if self.pretty { ", " } else { "," };
        if self.pretty && !items.is_empty() {
            format!("[{}; {}]", prefix, items.join(separator))
        } else {
            format!("[{};{}]", prefix, items.join(separator))
        }
    }

    fn key(&self, key: &str) -> String {
        let bare = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'));
        if bare { key.to_string() } else { self.quote(key) }
    }

    fn indent(&self, level: usize) -> String {
        "  ".repeat(level)
    }

    fn quote(&self, s: &str) -> String {
        let escaped: String = s
            .chars()
            .flat_map(|c| match c {
                '"' => vec!['\\', '"'],
                '\\' => vec!['\\', '\\'],
                '\n' => vec!['\\', 'n'],
                '\r' => vec!['\\', 'r'],
                '\t' => vec!['\\', 't'],
                c => vec![c],
            })
            .collect();
        format!("\"{}\"", escaped)
    }
}

/// Compact single-line SNBT for a compound.
pub fn to_snbt(compound: &Compound) -> String {
    SnbtPrinter::new(false).print_compound(compound)
}

/// SNBT with one entry per line and 2-space indentation.
pub fn to_snbt_pretty(compound: &Compound) -> String {
    SnbtPrinter::new(true).print_compound(compound)
}
