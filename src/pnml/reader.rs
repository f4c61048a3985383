//! 基于 `roxmltree` 的 PNML 读取器.
use indexmap::map::Entry;
use log::{debug, trace};
use roxmltree::{Document, Node, ParsingOptions};

use super::PnmlError;
use super::model::{Arc, EntityKind, PetriDocument, Place, Transition};
use crate::net::structure::Tokens;

/// Parses raw document bytes. The bytes must be UTF-8; a leading BOM is ignored.
pub fn parse_bytes(bytes: &[u8]) -> Result<PetriDocument, PnmlError> {
    let text = std::str::from_utf8(bytes)?;
    parse_str(text)
}

pub fn parse_str(text: &str) -> Result<PetriDocument, PnmlError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let xml = Document::parse_with_options(text, options)?;

    let net = xml
        .descendants()
        .find(|node| has_local_name(node, "net"))
        .ok_or(PnmlError::MalformedDocument)?;

    let mut doc = PetriDocument::new();
    for child in net.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "place" => read_place(&xml, child, &mut doc)?,
            "transition" => read_transition(&xml, child, &mut doc)?,
            "arc" => doc.arcs.push(read_arc(&xml, child)?),
            other => trace!("skipping <{other}> inside net"),
        }
    }

    debug!(
        "parsed net: {} places, {} transitions, {} arcs",
        doc.places.len(),
        doc.transitions.len(),
        doc.arcs.len()
    );
    Ok(doc)
}

fn read_place(xml: &Document<'_>, node: Node<'_, '_>, doc: &mut PetriDocument) -> Result<(), PnmlError> {
    let id = required_attribute(xml, node, EntityKind::Place, "id")?;
    let name = labelled_text(node, "name").unwrap_or_else(|| id.clone());
    let initial_marking = labelled_text(node, "initialMarking")
        .map(|text| parse_tokens(&id, &text))
        .unwrap_or(0);

    match doc.places.entry(id) {
        Entry::Occupied(entry) => Err(PnmlError::DuplicateId {
            kind: EntityKind::Place,
            id: entry.key().clone(),
        }),
        Entry::Vacant(entry) => {
            let place = Place::new(entry.key().clone(), name, initial_marking);
            entry.insert(place);
            Ok(())
        }
    }
}

fn read_transition(
    xml: &Document<'_>,
    node: Node<'_, '_>,
    doc: &mut PetriDocument,
) -> Result<(), PnmlError> {
    let id = required_attribute(xml, node, EntityKind::Transition, "id")?;
    let name = labelled_text(node, "name").unwrap_or_else(|| id.clone());

    match doc.transitions.entry(id) {
        Entry::Occupied(entry) => Err(PnmlError::DuplicateId {
            kind: EntityKind::Transition,
            id: entry.key().clone(),
        }),
        Entry::Vacant(entry) => {
            let transition = Transition::new(entry.key().clone(), name);
            entry.insert(transition);
            Ok(())
        }
    }
}

fn read_arc(xml: &Document<'_>, node: Node<'_, '_>) -> Result<Arc, PnmlError> {
    let id = required_attribute(xml, node, EntityKind::Arc, "id")?;
    let source = required_attribute(xml, node, EntityKind::Arc, "source")?;
    let target = required_attribute(xml, node, EntityKind::Arc, "target")?;
    Ok(Arc::new(id, source, target))
}

fn has_local_name(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| has_local_name(child, name))
}

/// Reads `<label><text>..</text></label>` below `node`.
///
/// Returns `None` only when the label or its `text` child is absent. A present
/// but empty `text` yields `Some("")`.
fn labelled_text(node: Node<'_, '_>, label: &str) -> Option<String> {
    let text = child_element(child_element(node, label)?, "text")?;
    Some(text.text().unwrap_or_default().trim().to_owned())
}

fn required_attribute(
    xml: &Document<'_>,
    node: Node<'_, '_>,
    kind: EntityKind,
    attribute: &'static str,
) -> Result<String, PnmlError> {
    attribute_value(node, attribute)
        .map(str::to_owned)
        .ok_or_else(|| PnmlError::MissingAttribute {
            kind,
            element: describe(xml, node),
            attribute,
        })
}

fn attribute_value<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attr| attr.name() == name)
        .map(|attr| attr.value())
}

/// Names an element for error messages: its id when it has one, else its position.
fn describe(xml: &Document<'_>, node: Node<'_, '_>) -> String {
    match attribute_value(node, "id") {
        Some(id) => format!("{id:?}"),
        None => format!("at {}", xml.text_pos_at(node.range().start)),
    }
}

fn parse_tokens(place: &str, text: &str) -> Tokens {
    match text.parse::<Tokens>() {
        Ok(tokens) => tokens,
        Err(err) => {
            debug!("place {place:?}: initial marking {text:?} unreadable ({err}), using 0");
            0
        }
    }
}
