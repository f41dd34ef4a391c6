use std::collections::HashMap;
use std::fmt;

/// The runtime kind of a tag inside a tagged-value tree.
///
/// This is a fixed enumeration; every tag carries exactly one of these kinds and
/// every query node declares the kind it expects to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    End,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    ByteArray,
    String,
    List,
    Compound,
    IntArray,
    LongArray,
}

impl TagKind {
    /// Lowercase name used in diagnostics, e.g. `"int"` or `"byte_array"`.
    pub fn name(self) -> &'static str {
        match self {
            TagKind::End => "end",
            TagKind::Byte => "byte",
            TagKind::Short => "short",
            TagKind::Int => "int",
            TagKind::Long => "long",
            TagKind::Float => "float",
            TagKind::Double => "double",
            TagKind::ByteArray => "byte_array",
            TagKind::String => "string",
            TagKind::List => "list",
            TagKind::Compound => "compound",
            TagKind::IntArray => "int_array",
            TagKind::LongArray => "long_array",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single value inside a tagged-value tree.
///
/// Unlike JSON, every numeric width is a distinct kind: a `Byte(1)` and an
/// `Int(1)` are different tags and never compare equal.
///
/// # Examples
///
/// ```
/// use nbt_query::{Tag, TagKind};
///
/// let damage = Tag::Int(10);
/// assert_eq!(damage.kind(), TagKind::Int);
///
/// let list = Tag::List(vec![Tag::String("a".into()), Tag::String("b".into())]);
/// assert_eq!(list.kind(), TagKind::List);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),

    /// Ordered list of tags; all elements share one kind
    List(Vec<Tag>),

    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        match self {
            Tag::Byte(_) => TagKind::Byte,
            Tag::Short(_) => TagKind::Short,
            Tag::Int(_) => TagKind::Int,
            Tag::Long(_) => TagKind::Long,
            Tag::Float(_) => TagKind::Float,
            Tag::Double(_) => TagKind::Double,
            Tag::ByteArray(_) => TagKind::ByteArray,
            Tag::String(_) => TagKind::String,
            Tag::List(_) => TagKind::List,
            Tag::Compound(_) => TagKind::Compound,
            Tag::IntArray(_) => TagKind::IntArray,
            Tag::LongArray(_) => TagKind::LongArray,
        }
    }
}

/// A compound tag: the string-keyed level of a tagged-value tree.
///
/// Query documents read from one `Compound` and write into a fresh one. Each tag
/// kind has a typed getter that returns `None` when the key is absent *or*
/// holds a different kind, and a typed setter that replaces whatever was there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    entries: HashMap<String, Tag>,
}

macro_rules! typed_accessors {
    ($($get:ident, $set:ident, $variant:ident, $ty:ty;)*) => {
        $(
            pub fn $get(&self, key: &str) -> Option<$ty> {
                match self.entries.get(key) {
                    Some(Tag::$variant(v)) => Some(*v),
                    _ => None,
                }
            }

            pub fn $set(&mut self, key: impl Into<String>, value: $ty) {
                self.entries.insert(key.into(), Tag::$variant(value));
            }
        )*
    };
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind of the tag stored under `key`, or `None` if the key is absent.
    pub fn kind_of(&self, key: &str) -> Option<TagKind> {
        self.entries.get(key).map(Tag::kind)
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, tag: Tag) -> Option<Tag> {
        self.entries.insert(key.into(), tag)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    typed_accessors! {
        get_byte, set_byte, Byte, i8;
        get_short, set_short, Short, i16;
        get_int, set_int, Int, i32;
        get_long, set_long, Long, i64;
        get_float, set_float, Float, f32;
        get_double, set_double, Double, f64;
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(Tag::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), Tag::String(value.into()));
    }

    pub fn get_compound(&self, key: &str) -> Option<&Compound> {
        match self.entries.get(key) {
            Some(Tag::Compound(c)) => Some(c),
            _ => None,
        }
    }

    pub fn set_compound(&mut self, key: impl Into<String>, value: Compound) {
        self.entries.insert(key.into(), Tag::Compound(value));
    }
}

impl FromIterator<(String, Tag)> for Compound {
    fn from_iter<I: IntoIterator<Item = (String, Tag)>>(iter: I) -> Self {
        Compound {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Compound {
    type Item = (String, Tag);
    type IntoIter = std::collections::hash_map::IntoIter<String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
