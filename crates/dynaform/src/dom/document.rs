use slotmap::{new_key_type, SlotMap};

use super::event::{DomEvent, EventResult, Handler};
use super::DomError;
use crate::error::FormError;

new_key_type! {
    /// Handle to a node in a [`Document`].
    pub struct NodeId;
}

// ── Element ───────────────────────────────────────────────────────────────

/// An element under construction, before it is inserted into a document.
///
/// ```rust,ignore
/// let input = doc.create(
///     Element::new("input")
///         .attr("type", "text")
///         .attr("name", "title")
///         .class("text")
///         .class_if("required", required),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    /// Attributes in insertion order. `class` is kept separately in `classes`.
    pub attrs: Vec<(String, String)>,
    pub classes: Vec<String>,
    /// Checked state for checkbox inputs.
    pub checked: bool,
    /// Initial text content, inserted as a text child.
    pub text: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), ..Self::default() }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_pair(&mut self.attrs, name.into(), value.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Adds `class` only when `on` is true.
    pub fn class_if(self, class: impl Into<String>, on: bool) -> Self {
        if on { self.class(class) } else { self }
    }

    pub fn checked(mut self, v: bool) -> Self { self.checked = v; self }
    pub fn text(mut self, v: impl Into<String>) -> Self { self.text = Some(v.into()); self }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

fn set_pair(attrs: &mut Vec<(String, String)>, name: String, value: String) {
    match attrs.iter_mut().find(|(k, _)| *k == name) {
        Some((_, v)) => *v = value,
        None => attrs.push((name, value)),
    }
}

// ── Selector ──────────────────────────────────────────────────────────────

/// Element matcher for tree queries.
#[derive(Debug, Clone, Copy)]
pub enum Selector<'a> {
    Tag(&'a str),
    Class(&'a str),
    /// Matches the `id` attribute.
    Id(&'a str),
    /// Matches when any of the inner selectors match.
    AnyOf(&'a [Selector<'a>]),
}

impl Selector<'_> {
    pub fn matches(&self, el: &Element) -> bool {
        match self {
            Selector::Tag(t) => el.tag == *t,
            Selector::Class(c) => el.has_class(c),
            Selector::Id(id) => el.get_attr("id") == Some(*id),
            Selector::AnyOf(all) => all.iter().any(|s| s.matches(el)),
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────

/// Payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
}

struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    handlers: Vec<(DomEvent, Handler)>,
    /// Set on containers whose children can be dragged; holds the handle class.
    sort_handle: Option<String>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self { kind, parent: None, children: Vec::new(), handlers: Vec::new(), sort_handle: None }
    }

    fn element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self) -> Option<&mut Element> {
        match &mut self.kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }
}

// ── Document ──────────────────────────────────────────────────────────────

/// A retained tree of elements, text and event handlers.
///
/// Nodes live in an arena and are addressed by [`NodeId`]. Removing a node
/// drops its whole subtree; ids of dropped nodes become stale and every
/// mutating call on them fails with [`DomError::Stale`].
#[derive(Default)]
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    // ── construction ──────────────────────────────────────────────────────

    /// Inserts a detached element (and its initial text, if any).
    pub fn create(&mut self, mut el: Element) -> NodeId {
        let text = el.text.take();
        let id = self.nodes.insert(Node::new(NodeKind::Element(el)));
        if let Some(text) = text {
            let t = self.nodes.insert(Node::new(NodeKind::Text(text)));
            self.nodes[t].parent = Some(id);
            self.nodes[id].children.push(t);
        }
        id
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.create(Element::new(tag))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Text(text.into())))
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    // ── structure edits ───────────────────────────────────────────────────

    /// Moves `child` to the end of `parent`'s children.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_move(child, parent)?;
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Moves `node` right before `reference` among `reference`'s siblings.
    pub fn insert_before(&mut self, node: NodeId, reference: NodeId) -> Result<(), DomError> {
        self.insert_at_sibling(node, reference, 0)
    }

    /// Moves `node` right after `reference` among `reference`'s siblings.
    pub fn insert_after(&mut self, node: NodeId, reference: NodeId) -> Result<(), DomError> {
        self.insert_at_sibling(node, reference, 1)
    }

    fn insert_at_sibling(&mut self, node: NodeId, reference: NodeId, offset: usize) -> Result<(), DomError> {
        if node == reference {
            return Ok(());
        }
        let parent = self.parent(reference).ok_or(DomError::Detached(reference))?;
        self.check_move(node, parent)?;
        self.detach(node);
        let pos = self.index_in_parent(reference).ok_or(DomError::Detached(reference))?;
        self.nodes[node].parent = Some(parent);
        self.nodes[parent].children.insert(pos + offset, node);
        Ok(())
    }

    /// Puts `wrapper` in `node`'s place and moves `node` inside it.
    pub fn wrap(&mut self, node: NodeId, wrapper: NodeId) -> Result<(), DomError> {
        if self.parent(node).is_some() {
            self.insert_before(wrapper, node)?;
        }
        self.append(wrapper, node)
    }

    /// Detaches `node` and drops it with its whole subtree.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        if !self.contains(node) {
            return Err(DomError::Stale(node));
        }
        self.detach(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.remove(id) {
                stack.extend(n.children);
            }
        }
        Ok(())
    }

    /// Removes all children of `node`.
    pub fn clear_children(&mut self, node: NodeId) -> Result<(), DomError> {
        for child in self.children(node).to_vec() {
            self.remove(child)?;
        }
        Ok(())
    }

    fn check_move(&self, node: NodeId, parent: NodeId) -> Result<(), DomError> {
        for id in [node, parent] {
            if !self.contains(id) {
                return Err(DomError::Stale(id));
            }
        }
        if self.ancestors(parent).any(|a| a == node) || node == parent {
            return Err(DomError::Cycle { node, parent });
        }
        Ok(())
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node].parent.take() {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|&c| c != node);
            }
        }
    }

    // ── navigation ────────────────────────────────────────────────────────

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    /// Children in order. Empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let pos = self.index_in_parent(id)?;
        let parent = self.parent(id)?;
        pos.checked_sub(1).map(|p| self.children(parent)[p])
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let pos = self.index_in_parent(id)?;
        let parent = self.parent(id)?;
        self.children(parent).get(pos + 1).copied()
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Descendants in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id).map(|n| &n.kind)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id)?.element()
    }

    pub fn matches(&self, id: NodeId, sel: Selector<'_>) -> bool {
        self.element(id).is_some_and(|el| sel.matches(el))
    }

    /// Nearest node matching `sel`, starting with `id` itself.
    pub fn closest(&self, id: NodeId, sel: Selector<'_>) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&n| self.matches(n, sel))
    }

    /// Matching descendants of `root` in document order.
    pub fn find(&self, root: NodeId, sel: Selector<'_>) -> Vec<NodeId> {
        self.descendants(root).into_iter().filter(|&n| self.matches(n, sel)).collect()
    }

    pub fn find_first(&self, root: NodeId, sel: Selector<'_>) -> Option<NodeId> {
        self.descendants(root).into_iter().find(|&n| self.matches(n, sel))
    }

    /// The element carrying `id` as its `id` attribute, searched in `root`
    /// and its subtree.
    pub fn element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        let sel = Selector::Id(id);
        if self.matches(root, sel) {
            return Some(root);
        }
        self.find_first(root, sel)
    }

    /// The topmost ancestor of `id`, or `id` itself when it is detached.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.get_attr(name)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    pub fn is_checked(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|el| el.checked)
    }

    /// Concatenated text of `id` and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        std::iter::once(id)
            .chain(self.descendants(id))
            .filter_map(|n| match self.kind(n) {
                Some(NodeKind::Text(t)) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    // ── element edits ─────────────────────────────────────────────────────

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Element, DomError> {
        self.nodes.get_mut(id).and_then(Node::element_mut).ok_or(DomError::Stale(id))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        set_pair(&mut el.attrs, name.to_string(), value.into());
        Ok(())
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        if !el.has_class(class) {
            el.classes.push(class.to_string());
        }
        Ok(())
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        self.element_mut(id)?.classes.retain(|c| c != class);
        Ok(())
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<(), DomError> {
        self.element_mut(id)?.checked = checked;
        Ok(())
    }

    /// Replaces the children of `id` with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        self.clear_children(id)?;
        let t = self.create_text(text);
        self.append(id, t)
    }

    // ── events ────────────────────────────────────────────────────────────

    /// Binds `handler` to `event` on `id`. Handlers run in binding order.
    pub fn on(&mut self, id: NodeId, event: DomEvent, handler: Handler) -> Result<(), DomError> {
        let node = self.nodes.get_mut(id).ok_or(DomError::Stale(id))?;
        node.handlers.push((event, handler));
        Ok(())
    }

    /// Dispatches `event` on `target`, then bubbles it through the ancestors
    /// until a handler consumes it.
    ///
    /// The propagation path is fixed before the first handler runs, so a
    /// handler removing its own subtree does not cut the dispatch short.
    pub fn trigger(&mut self, target: NodeId, event: DomEvent) -> Result<EventResult, FormError> {
        if !self.contains(target) {
            return Err(DomError::Stale(target).into());
        }
        let path: Vec<Handler> = std::iter::once(target)
            .chain(self.ancestors(target))
            .flat_map(|n| {
                self.nodes[n]
                    .handlers
                    .iter()
                    .filter(|(e, _)| *e == event)
                    .map(|(_, h)| h.clone())
                    .collect::<Vec<_>>()
            })
            .collect();

        for handler in path {
            if handler(self, target)?.is_consumed() {
                return Ok(EventResult::Consumed);
            }
        }
        Ok(EventResult::Ignored)
    }

    pub fn click(&mut self, target: NodeId) -> Result<EventResult, FormError> {
        self.trigger(target, DomEvent::Click)
    }

    // ── sorting ───────────────────────────────────────────────────────────

    /// Lets the children of `container` be dragged by a descendant carrying
    /// `handle_class`.
    pub fn make_sortable(&mut self, container: NodeId, handle_class: &str) -> Result<(), DomError> {
        let node = self.nodes.get_mut(container).ok_or(DomError::Stale(container))?;
        node.sort_handle = Some(handle_class.to_string());
        Ok(())
    }

    pub fn is_sortable(&self, container: NodeId) -> bool {
        self.nodes.get(container).is_some_and(|n| n.sort_handle.is_some())
    }

    /// Drags `item` to `position` among its siblings.
    pub fn sort_move(&mut self, item: NodeId, position: usize) -> Result<(), DomError> {
        if !self.contains(item) {
            return Err(DomError::Stale(item));
        }
        let container = self.parent(item).ok_or(DomError::NotSortable(item))?;
        let handle = self.nodes[container].sort_handle.clone().ok_or(DomError::NotSortable(item))?;
        if self.find_first(item, Selector::Class(&handle)).is_none() {
            return Err(DomError::NotSortable(item));
        }

        let len = self.children(container).len();
        if position >= len {
            return Err(DomError::OutOfRange { position, len });
        }
        let siblings = &mut self.nodes[container].children;
        siblings.retain(|&c| c != item);
        siblings.insert(position, item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::handler;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn list_of(doc: &mut Document, n: usize) -> (NodeId, Vec<NodeId>) {
        let ul = doc.create_element("ul");
        let items = (0..n)
            .map(|i| {
                let li = doc.create(Element::new("li").attr("data-i", i.to_string()));
                doc.append(ul, li).unwrap();
                li
            })
            .collect();
        (ul, items)
    }

    #[test]
    fn append_moves_between_parents() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let c = doc.create_element("span");
        doc.append(a, c).unwrap();
        doc.append(b, c).unwrap();
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[c]);
        assert_eq!(doc.parent(c), Some(b));
    }

    #[test]
    fn append_rejects_cycles() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append(a, b).unwrap();
        assert_eq!(doc.append(b, a), Err(DomError::Cycle { node: a, parent: b }));
    }

    #[test]
    fn insert_before_and_after_reorder_siblings() {
        let mut doc = Document::new();
        let (ul, items) = list_of(&mut doc, 3);
        doc.insert_before(items[2], items[0]).unwrap();
        assert_eq!(doc.children(ul), &[items[2], items[0], items[1]]);
        doc.insert_after(items[2], items[1]).unwrap();
        assert_eq!(doc.children(ul), &[items[0], items[1], items[2]]);
    }

    #[test]
    fn remove_drops_subtree() {
        let mut doc = Document::new();
        let (ul, items) = list_of(&mut doc, 2);
        let inner = doc.create_element("span");
        doc.append(items[0], inner).unwrap();
        doc.remove(items[0]).unwrap();
        assert!(!doc.contains(inner));
        assert_eq!(doc.children(ul), &[items[1]]);
        assert_eq!(doc.remove(items[0]), Err(DomError::Stale(items[0])));
    }

    #[test]
    fn wrap_takes_place_of_node() {
        let mut doc = Document::new();
        let (ul, items) = list_of(&mut doc, 2);
        let w = doc.create_element("div");
        doc.wrap(items[1], w).unwrap();
        assert_eq!(doc.children(ul), &[items[0], w]);
        assert_eq!(doc.children(w), &[items[1]]);
    }

    #[test]
    fn closest_is_inclusive_and_find_is_document_order() {
        let mut doc = Document::new();
        let form = doc.create_element("form");
        let div = doc.create(Element::new("div").class("labeled"));
        let a = doc.create(Element::new("span").class("errors"));
        let b = doc.create(Element::new("span").class("errors"));
        doc.append(form, div).unwrap();
        doc.append(div, a).unwrap();
        doc.append(form, b).unwrap();

        assert_eq!(doc.closest(div, Selector::Class("labeled")), Some(div));
        assert_eq!(doc.closest(a, Selector::Tag("form")), Some(form));
        assert_eq!(doc.find(form, Selector::Class("errors")), vec![a, b]);
        assert_eq!(doc.closest(form, Selector::Tag("li")), None);
    }

    #[test]
    fn trigger_bubbles_until_consumed() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("button");
        doc.append(outer, inner).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        doc.on(outer, DomEvent::Click, handler(move |_, _| {
            s.borrow_mut().push("outer");
            Ok(EventResult::Ignored)
        }))
        .unwrap();
        let s = Rc::clone(&seen);
        doc.on(inner, DomEvent::Click, handler(move |_, _| {
            s.borrow_mut().push("inner");
            Ok(EventResult::Ignored)
        }))
        .unwrap();

        assert_eq!(doc.click(inner).unwrap(), EventResult::Ignored);
        assert_eq!(*seen.borrow(), vec!["inner", "outer"]);

        doc.on(inner, DomEvent::Click, handler(|_, _| Ok(EventResult::Consumed))).unwrap();
        seen.borrow_mut().clear();
        assert_eq!(doc.click(inner).unwrap(), EventResult::Consumed);
        assert_eq!(*seen.borrow(), vec!["inner"]);
    }

    #[test]
    fn handler_may_remove_its_own_node() {
        let mut doc = Document::new();
        let (ul, items) = list_of(&mut doc, 2);
        let li = items[0];
        doc.on(li, DomEvent::Click, handler(move |doc, _| {
            doc.remove(li)?;
            Ok(EventResult::Consumed)
        }))
        .unwrap();
        doc.click(li).unwrap();
        assert_eq!(doc.children(ul), &[items[1]]);
    }

    #[test]
    fn sort_move_needs_sortable_parent_and_handle() {
        let mut doc = Document::new();
        let (ul, items) = list_of(&mut doc, 3);
        assert_eq!(doc.sort_move(items[0], 2), Err(DomError::NotSortable(items[0])));

        doc.make_sortable(ul, "item").unwrap();
        assert_eq!(doc.sort_move(items[0], 2), Err(DomError::NotSortable(items[0])));

        for &li in &items {
            let handle = doc.create(Element::new("span").class("item"));
            doc.append(li, handle).unwrap();
        }
        doc.sort_move(items[0], 2).unwrap();
        assert_eq!(doc.children(ul), &[items[1], items[2], items[0]]);
        assert_eq!(doc.sort_move(items[0], 3), Err(DomError::OutOfRange { position: 3, len: 3 }));
    }

    #[test]
    fn element_by_id_searches_only_the_given_subtree() {
        let mut doc = Document::new();
        let form = doc.create_element("form");
        let a = doc.create(Element::new("input").attr("id", "title"));
        doc.append(form, a).unwrap();
        let elsewhere = doc.create(Element::new("input").attr("id", "notes"));

        assert_eq!(doc.element_by_id(form, "title"), Some(a));
        assert_eq!(doc.element_by_id(a, "title"), Some(a));
        assert_eq!(doc.element_by_id(form, "notes"), None);
        assert_eq!(doc.element_by_id(elsewhere, "notes"), Some(elsewhere));

        doc.remove(a).unwrap();
        assert_eq!(doc.element_by_id(form, "title"), None);
        assert_eq!(doc.root_of(form), form);
    }

    #[test]
    fn set_text_replaces_children() {
        let mut doc = Document::new();
        let p = doc.create(Element::new("label").text("old"));
        doc.set_text(p, "new").unwrap();
        assert_eq!(doc.text_content(p), "new");
        assert_eq!(doc.children(p).len(), 1);
    }
}
