//! The fluent query builder.

use cyql_ir::{
    Fragment, FragmentArena, FragmentId, FragmentKind, Metadata, Params, Rendered,
    VarNameGenerator,
};

use crate::error::{Error, Result};
use crate::reference::{Capture, NameRef, NodeRef, RefTable, VarArg};
use crate::render;

/// Where a newly issued fragment lands relative to the open clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    TopLevel,
    ChildOfCurrent,
}

/// The one context-sensitive transition in the builder's state machine:
/// `SET` issued while an `ON CREATE` or `ON MATCH` clause is open nests
/// inside that clause; everywhere else it starts a new top-level fragment.
fn set_placement(current: Option<FragmentKind>) -> Placement {
    match current {
        Some(FragmentKind::OnCreate | FragmentKind::OnMatch) => Placement::ChildOfCurrent,
        _ => Placement::TopLevel,
    }
}

/// Stateful fluent API that assembles a fragment tree for one logical
/// statement sequence.
///
/// Clause methods (`match_`, `merge`, `optional`, `on_create`, `on_match`)
/// open a new top-level fragment and make it current. Element methods
/// (`node`, `relation`) nest inside the current clause and fail if none is
/// open. `build` consumes the builder and renders every top-level fragment
/// in call order; the resulting [`Rendered`] list feeds
/// [`prepare_queries`](crate::prepare_queries).
///
/// A builder owns its variable-name generator, so names are unique within
/// one builder run. Merging fragments from independent builder runs is the
/// assembler's job, which is also where cross-run collisions are caught.
///
/// # Example
///
/// ```
/// use cyql_builder::{Capture, QueryBuilder, prepare_queries};
/// use cyql_ir::props;
///
/// let mut qb = QueryBuilder::new();
/// let account = qb.node_ref();
/// qb.merge()
///     .node("Account", props! { "id" => "abc" }, Capture::node(account))?;
/// qb.return_([account.into()])?;
///
/// let prepared = prepare_queries(&qb.build()?)?;
/// assert_eq!(prepared.text, "MERGE (a:Account { id: $id__a })\nRETURN a");
/// # Ok::<(), cyql_builder::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct QueryBuilder {
    arena: FragmentArena,
    refs: RefTable,
    statements: Vec<FragmentId>,
    current: Option<FragmentId>,
    generator: VarNameGenerator,
}

impl QueryBuilder {
    /// Create an empty builder with a fresh variable-name generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unresolved name reference owned by this builder.
    pub fn name_ref(&mut self) -> NameRef {
        self.refs.new_name_ref()
    }

    /// Create an unresolved node reference owned by this builder.
    pub fn node_ref(&mut self) -> NodeRef {
        self.refs.new_node_ref()
    }

    /// Open a `MATCH` clause.
    pub fn match_(&mut self) -> &mut Self {
        self.open_clause(FragmentKind::Match)
    }

    /// Open a `MERGE` clause.
    pub fn merge(&mut self) -> &mut Self {
        self.open_clause(FragmentKind::Merge)
    }

    /// Open an `OPTIONAL` marker.
    ///
    /// Rendering emits only the keyword; elements added afterwards are not
    /// rendered under it. This mirrors the engine-facing behavior the
    /// builder has always had and is a known limitation, not an oversight
    /// to paper over here.
    pub fn optional(&mut self) -> &mut Self {
        self.open_clause(FragmentKind::Optional)
    }

    /// Open an `ON CREATE` clause. `set` calls issued while it is current
    /// nest inside it.
    pub fn on_create(&mut self) -> &mut Self {
        self.open_clause(FragmentKind::OnCreate)
    }

    /// Open an `ON MATCH` clause. `set` calls issued while it is current
    /// nest inside it.
    pub fn on_match(&mut self) -> &mut Self {
        self.open_clause(FragmentKind::OnMatch)
    }

    /// Append a node pattern to the current clause.
    ///
    /// A variable name is allocated only when `capture` holds a reference;
    /// purely structural nodes stay nameless unless properties force a
    /// lazy allocation at build time.
    pub fn node<'a>(
        &mut self,
        label: impl Into<Option<&'a str>>,
        props: Params,
        capture: Capture,
    ) -> Result<&mut Self> {
        self.element(FragmentKind::Node, label.into(), props, capture)
    }

    /// Append a directed relation pattern to the current clause. Same
    /// naming rules as [`node`](Self::node).
    pub fn relation<'a>(
        &mut self,
        label: impl Into<Option<&'a str>>,
        props: Params,
        capture: Capture,
    ) -> Result<&mut Self> {
        self.element(FragmentKind::Relation, label.into(), props, capture)
    }

    /// Append a `RETURN` of one or more variables or references.
    ///
    /// Every argument is resolved immediately, so an unresolved reference
    /// fails here rather than at render time. Does not change the current
    /// clause.
    pub fn return_<I>(&mut self, items: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = VarArg>,
    {
        let names = items
            .into_iter()
            .map(|arg| self.refs.resolve(&self.arena, &arg))
            .collect::<Result<Vec<String>>>()?;
        if names.is_empty() {
            return Err(Error::EmptyReturn);
        }

        let mut fragment = Fragment::new(FragmentKind::Return);
        fragment.metadata = Metadata::Return { names };
        let id = self.arena.alloc(fragment);
        self.statements.push(id);
        Ok(self)
    }

    /// Append a `SET` of properties on a previously resolved target.
    ///
    /// Nested under the current clause when that clause is `ON CREATE` or
    /// `ON MATCH`; a standalone top-level fragment otherwise.
    pub fn set(&mut self, target: impl Into<VarArg>, props: Params) -> Result<&mut Self> {
        let var = self.refs.resolve(&self.arena, &target.into())?;
        let mut fragment = Fragment::new(FragmentKind::Set);
        fragment.metadata = Metadata::Set { var, props };
        let id = self.arena.alloc(fragment);

        match set_placement(self.current_kind()) {
            Placement::ChildOfCurrent => self.attach_to_current(FragmentKind::Set, id)?,
            Placement::TopLevel => self.statements.push(id),
        }
        Ok(self)
    }

    /// Resolve a variable argument against this builder's state.
    pub fn resolve(&self, arg: impl Into<VarArg>) -> Result<String> {
        self.refs.resolve(&self.arena, &arg.into())
    }

    /// Render every top-level fragment, in call order.
    ///
    /// Consumes the builder: fragment trees are immutable once rendered.
    /// Before rendering, any element that carries properties but never
    /// received a variable name gets one from the same generator, so every
    /// parameterized element ends up addressable.
    pub fn build(mut self) -> Result<Vec<Rendered>> {
        self.assign_missing_names();
        self.statements
            .iter()
            .map(|&id| render::render_fragment(&self.arena, id))
            .collect()
    }

    fn open_clause(&mut self, kind: FragmentKind) -> &mut Self {
        let id = self.arena.alloc(Fragment::new(kind));
        self.statements.push(id);
        self.current = Some(id);
        self
    }

    fn element(
        &mut self,
        kind: FragmentKind,
        label: Option<&str>,
        props: Params,
        capture: Capture,
    ) -> Result<&mut Self> {
        if self.current.is_none() {
            return Err(Error::NoOpenClause { kind });
        }

        let var = capture.wants_var().then(|| self.generator.next_name());

        let mut fragment = Fragment::new(kind);
        fragment.label = label.map(str::to_owned);
        fragment.props = props;
        if let Some(name) = &var {
            fragment.assign_name(name.clone());
        }
        let id = self.arena.alloc(fragment);
        self.attach_to_current(kind, id)?;

        if let (Some(reference), Some(name)) = (capture.name, &var) {
            self.refs.bind_name(reference, name)?;
        }
        if let Some(reference) = capture.node {
            self.refs.bind_node(reference, id)?;
        }
        Ok(self)
    }

    fn attach_to_current(&mut self, kind: FragmentKind, child: FragmentId) -> Result<()> {
        let parent = self.current.ok_or(Error::NoOpenClause { kind })?;
        let clause = self
            .arena
            .get_mut(parent)
            .ok_or_else(|| Error::integrity("current clause missing from arena"))?;
        clause.children.push(child);
        Ok(())
    }

    fn current_kind(&self) -> Option<FragmentKind> {
        self.current
            .and_then(|id| self.arena.get(id))
            .map(|fragment| fragment.kind)
    }

    /// Allocation-order pass assigning names to parameterized elements
    /// that were never captured. Runs once, from the same generator as
    /// eager allocations, so lazy names cannot collide with earlier ones.
    /// Lazy names address parameters and are declared to the assembler
    /// but stay out of the pattern text, which keeps an uncaptured
    /// element rendering as `(:Label { ... })`.
    fn assign_missing_names(&mut self) {
        for fragment in self.arena.fragments_mut() {
            if fragment.kind.is_element()
                && !fragment.props.is_empty()
                && fragment.var_name().is_none()
            {
                fragment.assign_lazy_name(self.generator.next_name());
            }
        }
    }
}
