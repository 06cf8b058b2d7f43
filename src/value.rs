//! Lazy value materialization: classify a byte span on first access, then let
//! container nodes scan their own range on demand, caching discovered entries
//! in document order so partial progress is reused by later lookups.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use smol_str::SmolStr;

use crate::error::ExpectedBytes;
use crate::options::AttachOptions;
use crate::range::ByteRange;
use crate::{Error, Result};

const COLON: &[u8] = &[b':'];
const OPEN_BRACE: &[u8] = &[b'{'];
const CLOSE_BRACE: &[u8] = &[b'}'];
const OPEN_BRACKET: &[u8] = &[b'['];
const CLOSE_BRACKET: &[u8] = &[b']'];
const FIELD_END: &[u8] = &[b',', b'}'];
const ELEMENT_END: &[u8] = &[b',', b']'];

/// The shape a value was classified into on first access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Object,
    Array,
    Primitive,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::Primitive => "primitive",
        };
        f.write_str(name)
    }
}

/// One step of a traversal path: an object field name or an array position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    Key(&'a str),
    Index(usize),
}

impl Selector<'_> {
    fn kind(&self) -> SelectorKind {
        match self {
            Selector::Key(_) => SelectorKind::Key,
            Selector::Index(_) => SelectorKind::Index,
        }
    }
}

impl<'a> From<&'a str> for Selector<'a> {
    fn from(key: &'a str) -> Self {
        Selector::Key(key)
    }
}

impl From<usize> for Selector<'_> {
    fn from(index: usize) -> Self {
        Selector::Index(index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    Key,
    Index,
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorKind::Key => f.write_str("a key"),
            SelectorKind::Index => f.write_str("an index"),
        }
    }
}

/// Handle on an identified but not yet interpreted byte span.
///
/// Classification into object, array, or primitive happens at most once, on
/// first access, and is memoized. Containers scan further into their span only
/// as far as lookups require.
pub struct LazyValue {
    range: ByteRange,
    shared: Arc<AttachOptions>,
    depth: usize,
    node: Option<ValueNode>,
}

enum ValueNode {
    Primitive(Primitive),
    Object(ObjectNode),
    Array(ArrayNode),
}

impl ValueNode {
    fn kind(&self) -> ValueKind {
        match self {
            ValueNode::Primitive(_) => ValueKind::Primitive,
            ValueNode::Object(_) => ValueKind::Object,
            ValueNode::Array(_) => ValueKind::Array,
        }
    }
}

impl LazyValue {
    pub(crate) fn root(buf: Arc<[u8]>, options: AttachOptions) -> Self {
        Self {
            range: ByteRange::whole(buf),
            shared: Arc::new(options),
            depth: 0,
            node: None,
        }
    }

    fn child(range: ByteRange, shared: Arc<AttachOptions>, depth: usize) -> Self {
        Self {
            range,
            shared,
            depth,
            node: None,
        }
    }

    /// The byte span this handle covers.
    pub fn range(&self) -> &ByteRange {
        &self.range
    }

    /// Classify the span, scanning nothing beyond its first non-whitespace
    /// byte: `{` is an object, `[` an array, anything else a primitive.
    pub fn kind(&mut self) -> Result<ValueKind> {
        Ok(self.node()?.kind())
    }

    /// Navigate to a field or element, scanning only as far into this
    /// container as needed and caching every entry discovered on the way.
    ///
    /// `Ok(None)` means confirmed absence: the container was scanned to
    /// exhaustion without a match. Selecting with a key on an array, an index
    /// on an object, or anything on a primitive fails with
    /// [`Error::TypeMismatch`].
    pub fn get<'s, S>(&mut self, selector: S) -> Result<Option<&mut LazyValue>>
    where
        S: Into<Selector<'s>>,
    {
        let selector = selector.into();
        let shared = Arc::clone(&self.shared);
        let depth = self.depth;
        match (self.node()?, selector) {
            (ValueNode::Object(object), Selector::Key(key)) => object.lookup(key, &shared, depth),
            (ValueNode::Array(array), Selector::Index(index)) => {
                array.lookup(index, &shared, depth)
            }
            (node, selector) => Err(Error::TypeMismatch {
                kind: node.kind(),
                selector: selector.kind(),
            }),
        }
    }

    /// Follow a whole path of selectors; absence anywhere short-circuits.
    pub fn get_path<'s, I>(&mut self, path: I) -> Result<Option<&mut LazyValue>>
    where
        I: IntoIterator,
        I::Item: Into<Selector<'s>>,
    {
        let mut current = self;
        for selector in path {
            match current.get(selector)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Fully decode this value. Primitives hand their exact trimmed span to
    /// the injected decoder; containers finish scanning their remainder and
    /// decode every entry recursively, in document order.
    pub fn decode(&mut self) -> Result<Value> {
        let shared = Arc::clone(&self.shared);
        let depth = self.depth;
        match self.node()? {
            ValueNode::Primitive(primitive) => primitive.decode(&shared),
            ValueNode::Object(object) => object.decode(&shared, depth),
            ValueNode::Array(array) => array.decode(&shared, depth),
        }
    }

    /// Decode into a concrete deserializable type.
    pub fn decode_as<T: DeserializeOwned>(&mut self) -> Result<T> {
        let offset = self.range.start();
        let value = self.decode()?;
        serde_json::from_value(value).map_err(|err| Error::Decode {
            source: err.into(),
            offset,
        })
    }

    fn node(&mut self) -> Result<&mut ValueNode> {
        if self.node.is_none() {
            if self.depth > self.shared.max_depth {
                return Err(Error::DepthLimitExceeded {
                    limit: self.shared.max_depth,
                    offset: self.range.start(),
                });
            }
            let node = match self.range.skip_whitespace().first() {
                Some(b'{') => ValueNode::Object(ObjectNode::open(&self.range)?),
                Some(b'[') => ValueNode::Array(ArrayNode::open(&self.range)?),
                _ => ValueNode::Primitive(Primitive {
                    range: self.range.trimmed(),
                }),
            };
            self.node = Some(node);
        }
        Ok(self.node.as_mut().unwrap())
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyValue")
            .field("range", &self.range)
            .field("kind", &self.node.as_ref().map(ValueNode::kind))
            .finish()
    }
}

/// A value that is not an object or array; its interpretation is fully
/// delegated to the injected decoder.
struct Primitive {
    range: ByteRange,
}

impl Primitive {
    fn decode(&self, shared: &AttachOptions) -> Result<Value> {
        shared
            .decoder
            .decode(self.range.text())
            .map_err(|source| Error::Decode {
                source,
                offset: self.range.start(),
            })
    }
}

struct ObjectNode {
    fields: Vec<(SmolStr, LazyValue)>,
    cursor: ByteRange,
    exhausted: bool,
}

impl ObjectNode {
    fn open(range: &ByteRange) -> Result<Self> {
        let cursor = range.skip_whitespace().skip_byte(OPEN_BRACE, true)?;
        Ok(Self {
            fields: Vec::new(),
            cursor,
            exhausted: false,
        })
    }

    fn lookup(
        &mut self,
        key: &str,
        shared: &Arc<AttachOptions>,
        depth: usize,
    ) -> Result<Option<&mut LazyValue>> {
        if !self.fields.iter().any(|(name, _)| name.as_str() == key) {
            while self.advance(shared, depth)? {
                let matched = self
                    .fields
                    .last()
                    .is_some_and(|(name, _)| name.as_str() == key);
                if matched {
                    break;
                }
            }
        }
        Ok(self
            .fields
            .iter_mut()
            .find(|(name, _)| name.as_str() == key)
            .map(|(_, value)| value))
    }

    fn decode(&mut self, shared: &Arc<AttachOptions>, depth: usize) -> Result<Value> {
        while self.advance(shared, depth)? {}
        let mut map = Map::with_capacity(self.fields.len());
        for (name, value) in &mut self.fields {
            map.insert(name.to_string(), value.decode()?);
        }
        Ok(Value::Object(map))
    }

    /// Scan one more field out of the unscanned tail. Returns `false` once the
    /// closing brace has been consumed.
    fn advance(&mut self, shared: &Arc<AttachOptions>, depth: usize) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        self.cursor = self.cursor.skip_whitespace();
        match self.cursor.first() {
            Some(b'}') => {
                self.cursor = self.cursor.skip_byte(CLOSE_BRACE, true)?.skip_whitespace();
                self.exhausted = true;
                Ok(false)
            }
            Some(_) => {
                let field = self.read_field(shared, depth)?;
                self.fields.push(field);
                Ok(true)
            }
            None => Err(Error::UnexpectedByte {
                expected: ExpectedBytes::from_slice(CLOSE_BRACE),
                found: None,
                offset: self.cursor.start(),
            }),
        }
    }

    fn read_field(
        &mut self,
        shared: &Arc<AttachOptions>,
        depth: usize,
    ) -> Result<(SmolStr, LazyValue)> {
        let key_range = self.cursor.read_until(COLON, false, shared.max_depth)?;
        let key_offset = key_range.start();
        let decoded = shared
            .decoder
            .decode(key_range.trimmed().text())
            .map_err(|source| Error::Decode {
                source,
                offset: key_offset,
            })?;
        let name = match decoded {
            Value::String(name) => SmolStr::from(name),
            _ => return Err(Error::NonStringKey { offset: key_offset }),
        };
        self.cursor = key_range.remainder(&self.cursor)?;
        self.cursor = self.cursor.skip_byte(COLON, true)?;
        let value_range = self.cursor.read_until(FIELD_END, false, shared.max_depth)?;
        self.cursor = value_range.remainder(&self.cursor)?;
        let separator = self.cursor.read_byte(FIELD_END, true)?;
        // The comma is consumed here; the closing brace is left for advance.
        if separator.first() == Some(b',') {
            self.cursor = separator.remainder(&self.cursor)?;
        }
        let value = LazyValue::child(value_range, Arc::clone(shared), depth + 1);
        Ok((name, value))
    }
}

struct ArrayNode {
    elements: Vec<LazyValue>,
    cursor: ByteRange,
    exhausted: bool,
}

impl ArrayNode {
    fn open(range: &ByteRange) -> Result<Self> {
        let cursor = range.skip_whitespace().skip_byte(OPEN_BRACKET, true)?;
        Ok(Self {
            elements: Vec::new(),
            cursor,
            exhausted: false,
        })
    }

    fn lookup(
        &mut self,
        index: usize,
        shared: &Arc<AttachOptions>,
        depth: usize,
    ) -> Result<Option<&mut LazyValue>> {
        while self.elements.len() <= index && self.advance(shared, depth)? {}
        Ok(self.elements.get_mut(index))
    }

    fn decode(&mut self, shared: &Arc<AttachOptions>, depth: usize) -> Result<Value> {
        while self.advance(shared, depth)? {}
        let mut items = Vec::with_capacity(self.elements.len());
        for element in &mut self.elements {
            items.push(element.decode()?);
        }
        Ok(Value::Array(items))
    }

    /// Scan one more element out of the unscanned tail. Returns `false` once
    /// the closing bracket has been consumed.
    fn advance(&mut self, shared: &Arc<AttachOptions>, depth: usize) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        self.cursor = self.cursor.skip_whitespace();
        match self.cursor.first() {
            Some(b']') => {
                self.cursor = self
                    .cursor
                    .skip_byte(CLOSE_BRACKET, true)?
                    .skip_whitespace();
                self.exhausted = true;
                Ok(false)
            }
            Some(_) => {
                let element = self.read_element(shared, depth)?;
                self.elements.push(element);
                Ok(true)
            }
            None => Err(Error::UnexpectedByte {
                expected: ExpectedBytes::from_slice(CLOSE_BRACKET),
                found: None,
                offset: self.cursor.start(),
            }),
        }
    }

    fn read_element(&mut self, shared: &Arc<AttachOptions>, depth: usize) -> Result<LazyValue> {
        let value_range = self
            .cursor
            .read_until(ELEMENT_END, false, shared.max_depth)?;
        self.cursor = value_range.remainder(&self.cursor)?;
        let separator = self.cursor.read_byte(ELEMENT_END, true)?;
        if separator.first() == Some(b',') {
            self.cursor = separator.remainder(&self.cursor)?;
        }
        Ok(LazyValue::child(value_range, Arc::clone(shared), depth + 1))
    }
}
