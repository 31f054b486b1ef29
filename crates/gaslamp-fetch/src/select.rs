//! Structural path queries over parsed documents.

use crate::document::{Node, XmlDocument};

/// Element holding an endpoint reference.
pub const REF_TAG: &str = "ref";

/// Attribute holding a reference's target.
pub const HREF_ATTR: &str = "href";

/// Element wrapping history records.
pub const LIST_TAG: &str = "list";

/// Element holding one history record.
pub const RECORD_TAG: &str = "obj";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    name: String,
}

/// A path of element-name steps, written like `//list/obj`.
///
/// `//name` selects matching elements at any depth below the context and
/// `/name` selects matching direct children. Names are compared without
/// namespace prefixes and `*` matches any element. Results are in document
/// order without duplicates.
///
/// ```
/// use gaslamp_fetch::{NodePath, XmlDocument};
///
/// let doc = XmlDocument::parse(b"<obj><list><obj/><obj/></list></obj>").unwrap();
/// let path = NodePath::descendant("list").child("obj");
/// assert_eq!(path.to_string(), "//list/obj");
/// assert_eq!(path.select(&doc).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath {
    steps: Vec<Step>,
}

impl NodePath {
    /// Starts a path selecting `name` elements at any depth.
    #[must_use]
    pub fn descendant(name: impl Into<String>) -> Self {
        Self {
            steps: vec![Step {
                axis: Axis::Descendant,
                name: name.into(),
            }],
        }
    }

    /// Starts a path selecting top-level `name` elements.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            steps: vec![Step {
                axis: Axis::Child,
                name: name.into(),
            }],
        }
    }

    /// Appends a step selecting `name` children of the current selection.
    #[must_use]
    pub fn child(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step {
            axis: Axis::Child,
            name: name.into(),
        });
        self
    }

    /// Appends a step selecting `name` elements at any depth below the
    /// current selection.
    #[must_use]
    pub fn then_descendant(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step {
            axis: Axis::Descendant,
            name: name.into(),
        });
        self
    }

    /// Evaluates the path against a document.
    #[must_use]
    pub fn select<'a>(&self, doc: &'a XmlDocument) -> Vec<Node<'a>> {
        let mut steps = self.steps.iter();
        let Some(first) = steps.next() else {
            return Vec::new();
        };

        let mut selected: Vec<Node<'a>> = match first.axis {
            Axis::Child => doc.top_level().filter(|n| matches(n, &first.name)).collect(),
            Axis::Descendant => doc.elements().filter(|n| matches(n, &first.name)).collect(),
        };

        for step in steps {
            let mut next = Vec::new();
            for node in &selected {
                match step.axis {
                    Axis::Child => next.extend(node.children().filter(|n| matches(n, &step.name))),
                    Axis::Descendant => {
                        next.extend(node.descendants().filter(|n| matches(n, &step.name)));
                    }
                }
            }
            next.sort_by_key(Node::id);
            next.dedup();
            selected = next;
        }
        selected
    }
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for step in &self.steps {
            let separator = match step.axis {
                Axis::Child => "/",
                Axis::Descendant => "//",
            };
            write!(f, "{separator}{}", step.name)?;
        }
        Ok(())
    }
}

fn matches(node: &Node<'_>, name: &str) -> bool {
    node.is_element() && (name == "*" || node.has_local_name(name))
}

/// Path of every reference element: `//ref`.
#[must_use]
pub fn reference_path() -> NodePath {
    NodePath::descendant(REF_TAG)
}

/// Path of every history record: `//list/obj`.
#[must_use]
pub fn record_path() -> NodePath {
    NodePath::descendant(LIST_TAG).child(RECORD_TAG)
}

/// Returns the `href` of every reference element, in document order.
///
/// References without an `href` are skipped.
#[must_use]
pub fn reference_hrefs(doc: &XmlDocument) -> Vec<&str> {
    reference_path()
        .select(doc)
        .into_iter()
        .filter_map(|node| node.attribute(HREF_ATTR))
        .collect()
}

/// Returns every record element that is a direct child of a list element.
#[must_use]
pub fn history_record_nodes(doc: &XmlDocument) -> Vec<Node<'_>> {
    record_path().select(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATION: &str = r#"<obj href="http://h/obix/histories/site1/">
  <ref name="Temp" href="Temp/" is="obix:History"/>
  <ref name="Broken"/>
  <obj name="nested">
    <ref name="Humidity" href="/Humidity/"/>
  </obj>
  <list><ref name="Listed" href="Listed/"/></list>
</obj>"#;

    #[test]
    fn test_reference_hrefs_any_depth() {
        let doc = XmlDocument::parse(LOCATION.as_bytes()).unwrap();
        assert_eq!(
            reference_hrefs(&doc),
            vec!["Temp/", "/Humidity/", "Listed/"]
        );
    }

    #[test]
    fn test_reference_hrefs_empty_document() {
        let doc = XmlDocument::parse(b"<obj/>").unwrap();
        assert!(reference_hrefs(&doc).is_empty());
    }

    #[test]
    fn test_records_only_direct_list_children() {
        let doc = XmlDocument::parse(
            br#"<obj>
  <obj name="not a record"/>
  <list>
    <obj name="r1"><obj name="inner"/></obj>
    <int name="not an obj"/>
    <obj name="r2"/>
  </list>
  <obj><list><obj name="r3"/></list></obj>
</obj>"#,
        )
        .unwrap();

        let names: Vec<_> = history_record_nodes(&doc)
            .iter()
            .filter_map(|n| n.attribute("name"))
            .collect();
        assert_eq!(names, vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn test_nested_lists_no_duplicates() {
        let doc = XmlDocument::parse(b"<list><list><obj/></list><obj/></list>").unwrap();
        let path = NodePath::descendant("list").then_descendant("obj");
        assert_eq!(path.select(&doc).len(), 2);

        let ids: Vec<_> = path.select(&doc).iter().map(Node::id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_root_and_wildcard() {
        let doc = XmlDocument::parse(b"<obj><real/><str/></obj>").unwrap();
        assert_eq!(NodePath::root("obj").select(&doc).len(), 1);
        assert!(NodePath::root("list").select(&doc).is_empty());
        assert_eq!(NodePath::root("obj").child("*").select(&doc).len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(reference_path().to_string(), "//ref");
        assert_eq!(record_path().to_string(), "//list/obj");
        assert_eq!(NodePath::root("obj").then_descendant("ref").to_string(), "/obj//ref");
    }
}
