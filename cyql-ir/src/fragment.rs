//! The fragment tree: typed intermediate representation of a query.

use std::fmt;

use crate::value::Params;

/// Kind tag for a fragment. This is a closed set; the renderer dispatches
/// on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    Match,
    Merge,
    Optional,
    Node,
    Relation,
    Set,
    OnCreate,
    OnMatch,
    Return,
}

impl FragmentKind {
    /// Get the human-readable tag name, used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentKind::Match => "Match",
            FragmentKind::Merge => "Merge",
            FragmentKind::Optional => "Optional",
            FragmentKind::Node => "Node",
            FragmentKind::Relation => "Relation",
            FragmentKind::Set => "Set",
            FragmentKind::OnCreate => "OnCreate",
            FragmentKind::OnMatch => "OnMatch",
            FragmentKind::Return => "Return",
        }
    }

    /// Returns true for graph-entity kinds that nest inside a clause.
    pub fn is_element(&self) -> bool {
        matches!(self, FragmentKind::Node | FragmentKind::Relation)
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload carried by a fragment.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Metadata {
    /// No payload. Clauses and elements carry everything in their own
    /// fields.
    #[default]
    None,
    /// Return's ordered list of already-resolved variable names.
    Return { names: Vec<String> },
    /// Set's resolved target variable and its property map.
    Set { var: String, props: Params },
}

/// A node in the intermediate query tree.
///
/// Children are arena ids rather than owned boxes so that caller-held
/// references can point at fragments without aliasing; their order is the
/// left-to-right text order in the rendered clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub kind: FragmentKind,
    var_name: Option<String>,
    lazy_name: bool,
    pub label: Option<String>,
    pub props: Params,
    pub metadata: Metadata,
    pub children: Vec<FragmentId>,
}

impl Fragment {
    /// Create an empty fragment of the given kind.
    pub fn new(kind: FragmentKind) -> Self {
        Self {
            kind,
            var_name: None,
            lazy_name: false,
            label: None,
            props: Params::new(),
            metadata: Metadata::None,
            children: Vec::new(),
        }
    }

    /// The fragment's variable name, if one has been assigned.
    pub fn var_name(&self) -> Option<&str> {
        self.var_name.as_deref()
    }

    /// The variable name as it appears in pattern text.
    ///
    /// Lazily allocated names exist only to address parameters; they are
    /// omitted from the rendered pattern, so a parameterized element that
    /// was never captured still renders as `(:Label { ... })`.
    pub fn text_name(&self) -> Option<&str> {
        if self.lazy_name {
            None
        } else {
            self.var_name.as_deref()
        }
    }

    /// Assign the variable name. A name, once assigned, is never replaced.
    pub fn assign_name(&mut self, name: impl Into<String>) {
        debug_assert!(self.var_name.is_none(), "variable name assigned twice");
        self.var_name.get_or_insert(name.into());
    }

    /// Assign a variable name allocated at build time, after the element's
    /// pattern text shape was already fixed by its builder call. The name
    /// namespaces parameters and is declared to the assembler, but does
    /// not show up in the pattern.
    pub fn assign_lazy_name(&mut self, name: impl Into<String>) {
        self.assign_name(name);
        self.lazy_name = true;
    }
}

/// Handle to a fragment inside a [`FragmentArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentId(u32);

/// Owning store for one builder run's fragments.
///
/// Fragments are allocated in call order and addressed by [`FragmentId`],
/// so deferred references are plain indices instead of aliasable pointers.
#[derive(Debug, Default, Clone)]
pub struct FragmentArena {
    fragments: Vec<Fragment>,
}

impl FragmentArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fragment and return its handle.
    pub fn alloc(&mut self, fragment: Fragment) -> FragmentId {
        let id = FragmentId(self.fragments.len() as u32);
        self.fragments.push(fragment);
        id
    }

    /// Look up a fragment.
    pub fn get(&self, id: FragmentId) -> Option<&Fragment> {
        self.fragments.get(id.0 as usize)
    }

    /// Look up a fragment mutably.
    pub fn get_mut(&mut self, id: FragmentId) -> Option<&mut Fragment> {
        self.fragments.get_mut(id.0 as usize)
    }

    /// Iterate over all fragments mutably, in allocation order.
    pub fn fragments_mut(&mut self) -> impl Iterator<Item = &mut Fragment> {
        self.fragments.iter_mut()
    }

    /// Number of fragments allocated so far.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the arena holds no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
