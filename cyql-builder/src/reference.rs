//! Deferred variable-name references.
//!
//! A reference is created unresolved, handed to a builder call that
//! allocates an element, and bound exactly once at that point. Handles are
//! plain indices into a builder-owned slot table, so caller-held copies
//! never alias builder state. Handles carry no builder identity: mixing
//! handles across builders is caught only when the index is out of range
//! or hits a slot of the other variant.

use cyql_ir::{FragmentArena, FragmentId};

use crate::error::{Error, Result};

/// Handle that resolves to a plain variable-name string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameRef(pub(crate) u32);

/// Handle that resolves to the fragment it was captured by; its effective
/// value is that fragment's variable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub(crate) u32);

/// Something that names a variable: a literal name or a deferred handle.
#[derive(Debug, Clone)]
pub enum VarArg {
    /// A literal variable name, passed through unchanged.
    Name(String),
    /// A deferred name reference.
    NameRef(NameRef),
    /// A deferred node reference.
    NodeRef(NodeRef),
}

impl From<&str> for VarArg {
    fn from(name: &str) -> Self {
        VarArg::Name(name.to_owned())
    }
}

impl From<String> for VarArg {
    fn from(name: String) -> Self {
        VarArg::Name(name)
    }
}

impl From<NameRef> for VarArg {
    fn from(reference: NameRef) -> Self {
        VarArg::NameRef(reference)
    }
}

impl From<NodeRef> for VarArg {
    fn from(reference: NodeRef) -> Self {
        VarArg::NodeRef(reference)
    }
}

/// Capture options for `node` and `relation` calls.
///
/// Supplying either handle makes the builder allocate a variable name for
/// the element; elements captured by nothing stay nameless so generated
/// names remain compact.
#[derive(Debug, Clone, Copy, Default)]
pub struct Capture {
    pub name: Option<NameRef>,
    pub node: Option<NodeRef>,
}

impl Capture {
    /// Capture nothing; the element stays nameless unless properties force
    /// a lazy allocation at render time.
    pub const NONE: Capture = Capture {
        name: None,
        node: None,
    };

    /// Capture the element's variable name.
    pub fn name(reference: NameRef) -> Self {
        Capture {
            name: Some(reference),
            node: None,
        }
    }

    /// Capture the element itself.
    pub fn node(reference: NodeRef) -> Self {
        Capture {
            name: None,
            node: Some(reference),
        }
    }

    /// Capture both the name and the element.
    pub fn both(name: NameRef, node: NodeRef) -> Self {
        Capture {
            name: Some(name),
            node: Some(node),
        }
    }

    pub(crate) fn wants_var(&self) -> bool {
        self.name.is_some() || self.node.is_some()
    }
}

#[derive(Debug, Clone)]
enum RefSlot {
    PendingName,
    PendingNode,
    Name(String),
    Node(FragmentId),
}

/// Builder-owned storage backing [`NameRef`] and [`NodeRef`] handles.
#[derive(Debug, Default)]
pub(crate) struct RefTable {
    slots: Vec<RefSlot>,
}

impl RefTable {
    pub(crate) fn new_name_ref(&mut self) -> NameRef {
        self.slots.push(RefSlot::PendingName);
        NameRef(self.slots.len() as u32 - 1)
    }

    pub(crate) fn new_node_ref(&mut self) -> NodeRef {
        self.slots.push(RefSlot::PendingNode);
        NodeRef(self.slots.len() as u32 - 1)
    }

    pub(crate) fn bind_name(&mut self, reference: NameRef, name: &str) -> Result<()> {
        let slot = self
            .slots
            .get_mut(reference.0 as usize)
            .ok_or(Error::ForeignReference)?;
        debug_assert!(
            matches!(slot, RefSlot::PendingName),
            "name reference bound twice"
        );
        *slot = RefSlot::Name(name.to_owned());
        Ok(())
    }

    pub(crate) fn bind_node(&mut self, reference: NodeRef, id: FragmentId) -> Result<()> {
        let slot = self
            .slots
            .get_mut(reference.0 as usize)
            .ok_or(Error::ForeignReference)?;
        debug_assert!(
            matches!(slot, RefSlot::PendingNode),
            "node reference bound twice"
        );
        *slot = RefSlot::Node(id);
        Ok(())
    }

    /// Resolve an argument to a variable-name string.
    ///
    /// This is the single resolution path used by `return_`, `set`, and
    /// any other place accepting "a string or a reference".
    pub(crate) fn resolve(&self, arena: &FragmentArena, arg: &VarArg) -> Result<String> {
        match arg {
            VarArg::Name(name) => Ok(name.clone()),
            VarArg::NameRef(reference) => {
                match self.slots.get(reference.0 as usize) {
                    Some(RefSlot::Name(name)) => Ok(name.clone()),
                    Some(RefSlot::PendingName) => Err(Error::UnresolvedReference),
                    // A name handle pointing at a node slot can only come
                    // from a different builder's table.
                    Some(_) | None => Err(Error::ForeignReference),
                }
            }
            VarArg::NodeRef(reference) => match self.slots.get(reference.0 as usize) {
                Some(RefSlot::Node(id)) => {
                    let fragment = arena
                        .get(*id)
                        .ok_or_else(|| Error::integrity("node reference points outside arena"))?;
                    fragment
                        .var_name()
                        .map(str::to_owned)
                        .ok_or(Error::UnnamedElement)
                }
                Some(RefSlot::PendingNode) => Err(Error::UnresolvedReference),
                Some(_) | None => Err(Error::ForeignReference),
            },
        }
    }
}
