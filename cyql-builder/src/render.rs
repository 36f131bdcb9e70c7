//! Pure recursive rendering of fragment trees into query text.
//!
//! Rendering never mutates the tree and never allocates variable names;
//! the builder's pre-render pass guarantees that every parameterized
//! element is already named by the time a fragment reaches this module.

use cyql_ir::{Fragment, FragmentArena, FragmentId, FragmentKind, Metadata, Params, Rendered};

use crate::error::{Error, Result};

/// Render one top-level fragment into text, a namespaced parameter map,
/// and the list of variable names it introduces.
pub(crate) fn render_fragment(arena: &FragmentArena, id: FragmentId) -> Result<Rendered> {
    let fragment = arena
        .get(id)
        .ok_or_else(|| Error::integrity("dangling fragment id"))?;

    match fragment.kind {
        FragmentKind::Match => render_clause(arena, "MATCH ", fragment),
        FragmentKind::Merge => render_clause(arena, "MERGE ", fragment),
        FragmentKind::OnCreate => render_clause(arena, "ON CREATE ", fragment),
        FragmentKind::OnMatch => render_clause(arena, "ON MATCH ", fragment),
        // OPTIONAL emits only its keyword; children are not rendered.
        FragmentKind::Optional => Ok(Rendered::text_only("OPTIONAL")),
        FragmentKind::Node => render_element(fragment, "(", ")"),
        FragmentKind::Relation => render_element(fragment, "-[", "]->"),
        FragmentKind::Return => match &fragment.metadata {
            Metadata::Return { names } => {
                Ok(Rendered::text_only(format!("RETURN {}", names.join(", "))))
            }
            _ => Err(Error::integrity("Return fragment without a name list")),
        },
        FragmentKind::Set => match &fragment.metadata {
            Metadata::Set { var, props } => Ok(render_set(var, props)),
            _ => Err(Error::integrity("Set fragment without a target and properties")),
        },
    }
}

/// Render a clause keyword followed by its children in order.
///
/// Each child's parameters fold into this level namespaced by that
/// child's own variable name. Children without a variable name (`SET`
/// children) arrive pre-namespaced and merge untouched, so no key is ever
/// namespaced twice or by an ancestor's name.
fn render_clause(arena: &FragmentArena, keyword: &str, fragment: &Fragment) -> Result<Rendered> {
    let mut text = String::from(keyword);
    let mut parameters = Params::new();
    let mut variable_names = Vec::new();

    for &child_id in &fragment.children {
        let child = arena
            .get(child_id)
            .ok_or_else(|| Error::integrity("dangling child fragment id"))?;
        let rendered = render_fragment(arena, child_id)?;
        text.push_str(&rendered.text);
        variable_names.extend(rendered.variable_names);
        if rendered.parameters.is_empty() {
            continue;
        }
        match child.var_name() {
            Some(var) => parameters.extend(namespace_params(&rendered.parameters, var)),
            None => parameters.extend(rendered.parameters),
        }
    }

    Ok(Rendered {
        text,
        parameters,
        variable_names,
    })
}

/// Render a node `(var:Label { ... })` or relation `-[var:Label { ... }]->`.
///
/// Parameters are returned under their raw keys; the owning clause
/// namespaces them with this element's variable name.
fn render_element(fragment: &Fragment, open: &str, close: &str) -> Result<Rendered> {
    let mut text = String::from(open);
    // Only captured names appear in the pattern; a lazily allocated name
    // surfaces in parameter keys and declared variables alone.
    if let Some(var) = fragment.text_name() {
        text.push_str(var);
    }
    if let Some(label) = &fragment.label {
        text.push(':');
        text.push_str(label);
    }
    if !fragment.props.is_empty() {
        let var = fragment
            .var_name()
            .ok_or_else(|| Error::integrity("parameterized element has no variable name"))?;
        text.push_str(&props_pattern(&fragment.props, var));
    }
    text.push_str(close);

    Ok(Rendered {
        text,
        parameters: fragment.props.clone(),
        variable_names: fragment.var_name().map(str::to_owned).into_iter().collect(),
    })
}

/// Render `SET var.k = $k__var, ...` with self-namespaced parameters.
fn render_set(var: &str, props: &Params) -> Rendered {
    let assignments: Vec<String> = props
        .keys()
        .map(|key| format!("{var}.{key} = ${key}__{var}"))
        .collect();

    Rendered {
        text: format!("SET {}", assignments.join(", ")),
        parameters: namespace_params(props, var),
        variable_names: Vec::new(),
    }
}

/// `{ k1: $k1__var, k2: $k2__var }` property pattern, with leading space.
fn props_pattern(props: &Params, var: &str) -> String {
    let pairs: Vec<String> = props
        .keys()
        .map(|key| format!("{key}: ${key}__{var}"))
        .collect();
    format!(" {{ {} }}", pairs.join(", "))
}

/// Suffix every key with `__var`, preserving order.
fn namespace_params(props: &Params, var: &str) -> Params {
    props
        .iter()
        .map(|(key, value)| (format!("{key}__{var}"), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use cyql_ir::{Value, props};

    use super::*;

    fn named_element(kind: FragmentKind, label: &str, name: &str, props: Params) -> Fragment {
        let mut fragment = Fragment::new(kind);
        fragment.label = Some(label.to_owned());
        fragment.props = props;
        fragment.assign_name(name);
        fragment
    }

    #[test]
    fn test_node_renders_pattern_and_raw_params() {
        let mut arena = FragmentArena::new();
        let node = named_element(FragmentKind::Node, "Account", "a", props! { "id" => "abc" });
        let id = arena.alloc(node);

        let rendered = render_fragment(&arena, id).unwrap();
        assert_eq!(rendered.text, "(a:Account { id: $id__a })");
        assert_eq!(rendered.parameters, props! { "id" => "abc" });
        assert_eq!(rendered.variable_names, ["a"]);
    }

    #[test]
    fn test_nameless_node_omits_var_and_props_block() {
        let mut arena = FragmentArena::new();
        let mut node = Fragment::new(FragmentKind::Node);
        node.label = Some("Account".to_owned());
        let id = arena.alloc(node);

        let rendered = render_fragment(&arena, id).unwrap();
        assert_eq!(rendered.text, "(:Account)");
        assert!(rendered.parameters.is_empty());
        assert!(rendered.variable_names.is_empty());
    }

    #[test]
    fn test_lazily_named_element_keeps_name_out_of_pattern() {
        let mut arena = FragmentArena::new();
        let mut relation = Fragment::new(FragmentKind::Relation);
        relation.label = Some("Bar".to_owned());
        relation.props = props! { "id" => "xyz" };
        relation.assign_lazy_name("b");
        let id = arena.alloc(relation);

        let rendered = render_fragment(&arena, id).unwrap();
        // The lazy name namespaces the parameter and is declared, but the
        // pattern itself stays anonymous.
        assert_eq!(rendered.text, "-[:Bar { id: $id__b }]->");
        assert_eq!(rendered.variable_names, ["b"]);
        assert_eq!(rendered.parameters, props! { "id" => "xyz" });
    }

    #[test]
    fn test_relation_renders_arrow_syntax() {
        let mut arena = FragmentArena::new();
        let relation =
            named_element(FragmentKind::Relation, "Bar", "b", props! { "id" => "xyz" });
        let id = arena.alloc(relation);

        let rendered = render_fragment(&arena, id).unwrap();
        assert_eq!(rendered.text, "-[b:Bar { id: $id__b }]->");
    }

    #[test]
    fn test_clause_namespaces_each_child_by_its_own_name() {
        let mut arena = FragmentArena::new();
        let node = named_element(FragmentKind::Node, "Account", "a", props! { "id" => "1" });
        let node_id = arena.alloc(node);
        let relation = named_element(FragmentKind::Relation, "Owns", "b", props! { "id" => "2" });
        let relation_id = arena.alloc(relation);
        let mut clause = Fragment::new(FragmentKind::Match);
        clause.children = vec![node_id, relation_id];
        let clause_id = arena.alloc(clause);

        let rendered = render_fragment(&arena, clause_id).unwrap();
        assert_eq!(
            rendered.text,
            "MATCH (a:Account { id: $id__a })-[b:Owns { id: $id__b }]->"
        );
        assert_eq!(
            rendered.parameters,
            props! { "id__a" => "1", "id__b" => "2" }
        );
        assert_eq!(rendered.variable_names, ["a", "b"]);
    }

    #[test]
    fn test_set_parameters_are_not_namespaced_twice() {
        let mut arena = FragmentArena::new();
        let mut set = Fragment::new(FragmentKind::Set);
        set.metadata = Metadata::Set {
            var: "a".to_owned(),
            props: props! { "name" => "Max" },
        };
        let set_id = arena.alloc(set);
        let mut clause = Fragment::new(FragmentKind::OnCreate);
        clause.children = vec![set_id];
        let clause_id = arena.alloc(clause);

        let rendered = render_fragment(&arena, clause_id).unwrap();
        assert_eq!(rendered.text, "ON CREATE SET a.name = $name__a");
        assert_eq!(
            rendered.parameters.get("name__a"),
            Some(&Value::from("Max"))
        );
        assert_eq!(rendered.parameters.len(), 1);
    }

    #[test]
    fn test_optional_ignores_children() {
        let mut arena = FragmentArena::new();
        let node = named_element(FragmentKind::Node, "Account", "a", props! { "id" => "1" });
        let node_id = arena.alloc(node);
        let mut optional = Fragment::new(FragmentKind::Optional);
        optional.children = vec![node_id];
        let optional_id = arena.alloc(optional);

        let rendered = render_fragment(&arena, optional_id).unwrap();
        assert_eq!(rendered.text, "OPTIONAL");
        assert!(rendered.parameters.is_empty());
    }

    #[test]
    fn test_return_without_metadata_is_integrity_error() {
        let mut arena = FragmentArena::new();
        let id = arena.alloc(Fragment::new(FragmentKind::Return));
        let err = render_fragment(&arena, id).unwrap_err();
        assert!(matches!(err, Error::Integrity { .. }));
    }
}
