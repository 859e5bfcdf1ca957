//! Script entries and registration options.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Where a script is emitted on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptTarget {
    Head,
    Body,
}

impl ScriptTarget {
    /// `head` (any case, surrounding whitespace ignored) selects the head;
    /// everything else lands in the body.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("head") {
            Self::Head
        } else {
            Self::Body
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Body => "body",
        }
    }
}

/// A `<script>` attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// `true` renders `name="name"`, `false` renders nothing.
    Flag(bool),
    Text(String),
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Ordered attribute list; names are unique, later writes replace.
pub type Attrs = Vec<(String, AttrValue)>;

/// One compiled script, keyed by `hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptEntry {
    pub hash: String,
    pub code: String,
    pub target: ScriptTarget,
    #[serde(serialize_with = "serialize_attrs")]
    pub attrs: Attrs,
    pub once: bool,
}

fn serialize_attrs<S: Serializer>(attrs: &Attrs, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(attrs.len()))?;
    for (name, value) in attrs {
        map.serialize_entry(name, value)?;
    }
    map.end()
}

// ============================================================================
// ScriptOptions
// ============================================================================

/// Registration options. Unset fields fall back to the registry defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptOptions {
    pub target: Option<String>,
    pub once: Option<bool>,
    pub hash: Option<String>,
    pub attrs: Attrs,
}

impl ScriptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults applied to inline script blocks.
    pub fn block_defaults() -> Self {
        Self {
            target: Some(ScriptTarget::Head.as_str().to_string()),
            once: Some(true),
            ..Self::default()
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn once(mut self, once: bool) -> Self {
        self.once = Some(once);
        self
    }

    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        set_attr(&mut self.attrs, name.into(), value.into());
        self
    }

    /// Fill every unset field of `self` from `defaults`.
    pub fn merged_over(mut self, defaults: &Self) -> Self {
        if self.target.is_none() {
            self.target.clone_from(&defaults.target);
        }
        if self.once.is_none() {
            self.once = defaults.once;
        }
        if self.hash.is_none() {
            self.hash.clone_from(&defaults.hash);
        }
        for (name, value) in &defaults.attrs {
            if !self.attrs.iter().any(|(n, _)| n == name) {
                self.attrs.push((name.clone(), value.clone()));
            }
        }
        self
    }

    pub fn resolved_target(&self) -> ScriptTarget {
        self.target
            .as_deref()
            .map_or(ScriptTarget::Body, ScriptTarget::parse)
    }

    pub fn resolved_once(&self) -> bool {
        self.once.unwrap_or(true)
    }

    /// Build options from loosely-typed JSON, e.g. a page fixture.
    ///
    /// `attrs` may be an object or a list of `[name, value]` pairs; pairs
    /// whose name is not a string are dropped, as are values that are not
    /// booleans, strings or numbers. A non-string `target` still coerces
    /// to the body.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let target = obj.get("target").map(|t| match t {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

        Self {
            target,
            once: obj.get("once").and_then(Value::as_bool),
            hash: obj
                .get("hash")
                .and_then(Value::as_str)
                .filter(|h| !h.is_empty())
                .map(str::to_string),
            attrs: obj.get("attrs").map(normalize_attrs).unwrap_or_default(),
        }
    }
}

fn set_attr(attrs: &mut Attrs, name: String, value: AttrValue) {
    match attrs.iter_mut().find(|(n, _)| *n == name) {
        Some(slot) => slot.1 = value,
        None => attrs.push((name, value)),
    }
}

fn attr_value(value: &Value) -> Option<AttrValue> {
    match value {
        Value::Bool(b) => Some(AttrValue::Flag(*b)),
        Value::String(s) => Some(AttrValue::Text(s.clone())),
        Value::Number(n) => Some(AttrValue::Text(n.to_string())),
        Value::Null => Some(AttrValue::Flag(false)),
        _ => None,
    }
}

/// Keep string-keyed attribute entries with scalar values.
pub fn normalize_attrs(value: &Value) -> Attrs {
    let mut attrs = Attrs::new();
    match value {
        Value::Object(map) => {
            for (name, value) in map {
                if let Some(value) = attr_value(value) {
                    set_attr(&mut attrs, name.clone(), value);
                }
            }
        }
        Value::Array(pairs) => {
            for pair in pairs {
                if let Some([Value::String(name), value]) = pair.as_array().map(Vec::as_slice)
                    && let Some(value) = attr_value(value)
                {
                    set_attr(&mut attrs, name.clone(), value);
                }
            }
        }
        _ => {}
    }
    attrs
}
