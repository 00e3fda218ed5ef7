use super::pattern::literal_len;
use crate::error::InsertError;
use crate::params::Params;
use std::mem;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    Static,
    Param { name: Box<str> },
    CatchAll { name: Box<str> },
}

/// One compressed fragment of the trie.
///
/// Static prefixes are stored as bytes: splitting two literals that share the
/// first byte of a multi-byte character leaves a fragment ending mid-character,
/// which is fine as long as nothing slices a `str` at that offset.
#[derive(Debug)]
pub(crate) struct Node<T> {
    prefix: Vec<u8>,
    kind: Kind,
    // values reachable from this node
    priority: u32,
    // first byte of each static child, kept in `children` order
    indices: Vec<u8>,
    children: Vec<Node<T>>,
    param: Option<Box<Node<T>>>,
    catch_all: Option<Box<Node<T>>>,
    value: Option<T>,
}

impl<T> Node<T> {
    pub(crate) fn root() -> Self {
        Self::new(Vec::new(), Kind::Static)
    }

    fn new(prefix: Vec<u8>, kind: Kind) -> Self {
        Self {
            prefix,
            kind,
            priority: 0,
            indices: Vec::new(),
            children: Vec::new(),
            param: None,
            catch_all: None,
            value: None,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_empty() && self.param.is_none() && self.catch_all.is_none()
    }

    fn wildcard_name(&self) -> &str {
        match &self.kind {
            Kind::Param { name } | Kind::CatchAll { name } => name,
            Kind::Static => "",
        }
    }

    fn wildcard_pattern(&self) -> String {
        match &self.kind {
            Kind::Param { name } => format!(":{name}"),
            Kind::CatchAll { name } => format!("*{name}"),
            Kind::Static => String::new(),
        }
    }

    #[inline]
    fn static_child(&self, first: u8) -> Option<&Node<T>> {
        self.indices.iter().position(|&c| c == first).map(|index| &self.children[index])
    }

    /// Inserts `pattern[pos..]` starting at this static node.
    ///
    /// The pattern must have been validated. Errors are only possible once the
    /// walk has left the literal part behind, so a failed insertion never
    /// leaves a split or a half-built branch behind.
    pub(crate) fn insert(&mut self, pattern: &str, pos: usize, value: T) -> Result<(), InsertError> {
        let rest = &pattern.as_bytes()[pos..];
        let literal = &rest[..literal_len(rest)];
        let common = self.prefix.iter().zip(literal).take_while(|(a, b)| a == b).count();

        if common < self.prefix.len() {
            self.split(common);
        }

        self.insert_below(pattern, pos + common, value)
    }

    /// Inserts `pattern[pos..]` below this node, whose own fragment is already consumed.
    fn insert_below(&mut self, pattern: &str, pos: usize, value: T) -> Result<(), InsertError> {
        let rest = &pattern.as_bytes()[pos..];

        match rest {
            [] => {
                if self.value.is_some() {
                    return Err(InsertError::duplicate(pattern));
                }
                self.value = Some(value);
            }
            [b':', ..] => {
                let end = segment_end(pattern.as_bytes(), pos);
                let name = &pattern[pos + 1..end];
                let param = self
                    .param
                    .get_or_insert_with(|| Box::new(Node::new(Vec::new(), Kind::Param { name: name.into() })));

                if param.wildcard_name() != name {
                    return Err(InsertError::wildcard_conflict(pattern, &param.wildcard_pattern(), &format!(":{name}")));
                }
                param.insert_below(pattern, end, value)?;
            }
            [b'/', b'*', ..] => {
                let name = &pattern[pos + 2..];
                if let Some(catch_all) = &self.catch_all {
                    return Err(if catch_all.wildcard_name() == name {
                        InsertError::duplicate(pattern)
                    } else {
                        InsertError::wildcard_conflict(pattern, &catch_all.wildcard_pattern(), &format!("*{name}"))
                    });
                }

                let mut catch_all = Node::new(Vec::new(), Kind::CatchAll { name: name.into() });
                catch_all.value = Some(value);
                catch_all.priority = 1;
                self.catch_all = Some(Box::new(catch_all));
            }
            [first, ..] => {
                let index = if let Some(index) = self.indices.iter().position(|c| c == first) {
                    index
                } else {
                    self.indices.push(*first);
                    self.children.push(Node::new(rest[..literal_len(rest)].to_vec(), Kind::Static));
                    self.children.len() - 1
                };

                self.children[index].insert(pattern, pos, value)?;
                self.reorder_child(index);
            }
        }

        self.priority += 1;
        Ok(())
    }

    /// Moves everything after `at` into a new static child.
    fn split(&mut self, at: usize) {
        let child = Node {
            prefix: self.prefix.split_off(at),
            kind: Kind::Static,
            priority: self.priority,
            indices: mem::take(&mut self.indices),
            children: mem::take(&mut self.children),
            param: self.param.take(),
            catch_all: self.catch_all.take(),
            value: self.value.take(),
        };

        self.indices = vec![child.prefix[0]];
        self.children = vec![child];
    }

    /// Keeps static children sorted by descending priority, ties keep insertion order.
    fn reorder_child(&mut self, index: usize) {
        let priority = self.children[index].priority;
        let mut target = index;
        while target > 0 && self.children[target - 1].priority < priority {
            target -= 1;
        }

        if target != index {
            self.children[target..=index].rotate_right(1);
            self.indices[target..=index].rotate_right(1);
        }
    }

    /// Matches `path[pos..]` against this static node and its subtree.
    pub(crate) fn at<'n, 'p>(&'n self, path: &'p str, pos: usize, params: &mut Params<'n, 'p>) -> Option<&'n T> {
        if !path.as_bytes()[pos..].starts_with(&self.prefix) {
            return None;
        }
        self.descend(path, pos + self.prefix.len(), params)
    }

    fn descend<'n, 'p>(&'n self, path: &'p str, pos: usize, params: &mut Params<'n, 'p>) -> Option<&'n T> {
        let Some(&first) = path.as_bytes().get(pos) else {
            return self.value.as_ref();
        };
        let checkpoint = params.len();

        if let Some(child) = self.static_child(first) {
            if let Some(value) = child.at(path, pos, params) {
                return Some(value);
            }
            params.truncate(checkpoint);
        }

        if let Some(param) = &self.param {
            let end = segment_end(path.as_bytes(), pos);
            if let Some(segment) = path.get(pos..end).filter(|segment| !segment.is_empty()) {
                params.push(param.wildcard_name(), segment);
                if let Some(value) = param.descend(path, end, params) {
                    return Some(value);
                }
                params.truncate(checkpoint);
            }
        }

        if first == b'/' {
            if let (Some(catch_all), Some(tail)) = (&self.catch_all, path.get(pos..)) {
                params.push(catch_all.wildcard_name(), tail);
                return catch_all.value.as_ref();
            }
        }

        None
    }

    /// Reports whether `path[pos..]` followed by one extra `/` reaches a value.
    pub(crate) fn at_with_slash(&self, path: &[u8], pos: usize) -> bool {
        let rest = &path[pos..];
        if rest.starts_with(&self.prefix) {
            return self.descend_with_slash(path, pos + self.prefix.len());
        }

        // the fragment is exactly the rest of the path plus the slash
        self.value.is_some()
            && self.prefix.len() == rest.len() + 1
            && self.prefix.starts_with(rest)
            && self.prefix.ends_with(b"/")
    }

    fn descend_with_slash(&self, path: &[u8], pos: usize) -> bool {
        // past the end of the path only the virtual slash is left
        let first = path.get(pos).copied().unwrap_or(b'/');

        if self.static_child(first).is_some_and(|child| child.at_with_slash(path, pos)) {
            return true;
        }

        if let Some(param) = &self.param {
            let end = segment_end(path, pos);
            if end > pos && param.descend_with_slash(path, end) {
                return true;
            }
        }

        first == b'/' && self.catch_all.is_some()
    }

    /// Case-insensitive variant of [`Node::at`] writing the registered spelling into `out`.
    pub(crate) fn find_case_insensitive(&self, path: &[u8], pos: usize, fix_slash: bool, out: &mut Vec<u8>) -> bool {
        let rest = &path[pos..];
        let len = self.prefix.len();

        if rest.len() >= len && rest[..len].eq_ignore_ascii_case(&self.prefix) {
            let mark = out.len();
            out.extend_from_slice(&self.prefix);
            if self.descend_case_insensitive(path, pos + len, fix_slash, out) {
                return true;
            }
            out.truncate(mark);
            return false;
        }

        // missing trailing slash
        if fix_slash
            && self.value.is_some()
            && len == rest.len() + 1
            && self.prefix.ends_with(b"/")
            && self.prefix[..rest.len()].eq_ignore_ascii_case(rest)
        {
            out.extend_from_slice(&self.prefix);
            return true;
        }

        false
    }

    fn descend_case_insensitive(&self, path: &[u8], pos: usize, fix_slash: bool, out: &mut Vec<u8>) -> bool {
        let rest = &path[pos..];
        let Some(&first) = rest.first() else {
            if self.value.is_some() {
                return true;
            }
            let slash_route = self.catch_all.is_some()
                || self.static_child(b'/').is_some_and(|child| child.prefix == b"/" && child.value.is_some());
            if fix_slash && slash_route {
                out.push(b'/');
                return true;
            }
            return false;
        };

        // both spellings of a letter may have their own child
        for (index, child) in self.children.iter().enumerate() {
            if self.indices[index].eq_ignore_ascii_case(&first) && child.find_case_insensitive(path, pos, fix_slash, out) {
                return true;
            }
        }

        if let Some(param) = &self.param {
            let end = segment_end(path, pos);
            if end > pos {
                let mark = out.len();
                out.extend_from_slice(&path[pos..end]);
                if param.descend_case_insensitive(path, end, fix_slash, out) {
                    return true;
                }
                out.truncate(mark);
            }
        }

        if first == b'/' && self.catch_all.is_some() {
            out.extend_from_slice(rest);
            return true;
        }

        // extra trailing slash
        fix_slash && rest == b"/" && self.value.is_some()
    }
}

/// Index of the next `/` at or after `pos`, or the end of the path.
#[inline]
fn segment_end(path: &[u8], pos: usize) -> usize {
    path[pos..].iter().position(|&b| b == b'/').map_or(path.len(), |offset| pos + offset)
}
