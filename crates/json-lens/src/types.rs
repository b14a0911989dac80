//! Compiled path types.

/// A compiled path expression: an ordered sequence of segments.
///
/// Paths are immutable once built and hold no references into the source
/// text, so one compiled path may be shared across threads and evaluated
/// against any number of documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub segments: Vec<Segment>,
}

impl Path {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// One navigation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Object member by exact key: `name`, `a\.b`
    Field(String),
    /// Array element by position: `0`
    Index(usize),
    /// First key (or element string form) matching a glob: `na*`, `n?me`
    Wildcard(String),
    /// Element or key count: `#`
    Length,
    /// Apply a sub-path to every element: `#.key`
    CollectAll(Path),
    /// Predicate filter: `#(expr)` / `#(expr)#`
    Query(Query),
    /// Projection into a new object or array: `{a,b}` / `[a,b]`
    MultiSelect(MultiSelect),
    /// Inline JSON value: `!true`, `!{"a":1}`
    Literal(String),
    /// Transformer call: `@name`, `@name:arg`
    Transform(Transform),
    /// Recursive descent below the current value: `a..key`
    Descent(Descent),
    /// JSON Lines: `..path` at the start of a path
    Lines(Path),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub expr: QueryExpr,
    /// `#(..)#` collects every match instead of the first.
    pub all: bool,
    /// Per-match sub-path following `#(..)#.`
    pub each: Path,
}

/// Predicate expression; `&&` binds tighter than `||`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpr {
    Compare(Comparison),
    And(Box<QueryExpr>, Box<QueryExpr>),
    Or(Box<QueryExpr>, Box<QueryExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Path of the tested field relative to the element; empty for the
    /// element itself.
    pub field: Path,
    /// `None` is an existence test.
    pub op: Option<QueryOp>,
    pub value: QueryValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOp {
    Eq,      // == or =
    Ne,      // !=
    Lt,      // <
    Le,      // <=
    Gt,      // >
    Ge,      // >=
    Like,    // %
    NotLike, // !%
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    None,
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
    Tilde(Tilde),
}

/// Type-coercing query tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tilde {
    True,  // ~true
    False, // ~false
    Null,  // ~null
    Any,   // ~*
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelect {
    pub entries: Vec<SelectEntry>,
    /// `[..]` builds an array, `{..}` an object.
    pub as_array: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectEntry {
    /// Object key for the entry's result.
    pub key: String,
    pub path: Path,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub name: String,
    /// Raw argument text after `:`, passed to the transformer undecoded.
    pub arg: Option<String>,
    /// The segment as written, used as a field name when transformers are
    /// disabled.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Descent {
    /// Exact key or glob.
    pub key: String,
    /// Sub-path applied to every match.
    pub each: Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn paths_are_shareable() {
        assert_send_sync::<Path>();
        assert_send_sync::<Segment>();
    }

    #[test]
    fn empty_path() {
        assert!(Path::default().is_empty());
        assert!(!Path::new(vec![Segment::Length]).is_empty());
    }
}
