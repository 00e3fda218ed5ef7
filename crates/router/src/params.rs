//! Path parameters extracted by a single match.
//!
//! Keys borrow from the route table and values borrow from the request path,
//! so building a parameter list never copies strings. A match without
//! parameters never allocates.

use std::slice;

static EMPTY: Params<'static, 'static> = Params::empty();

/// A single `(key, value)` binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param<'k, 'v> {
    key: &'k str,
    value: &'v str,
}

impl<'k, 'v> Param<'k, 'v> {
    #[inline]
    pub fn key(&self) -> &'k str {
        self.key
    }

    #[inline]
    pub fn value(&self) -> &'v str {
        self.value
    }
}

/// Ordered parameter list, left-to-right as the parameters appear in the path.
///
/// Names are not required to be unique; [`Params::get`] resolves to the first binding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params<'k, 'v> {
    kind: ParamsKind<'k, 'v>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum ParamsKind<'k, 'v> {
    #[default]
    None,
    List(Vec<Param<'k, 'v>>),
}

impl<'k, 'v> Params<'k, 'v> {
    /// Creates an empty list, no allocation happens until the first push.
    #[inline]
    pub const fn empty() -> Self {
        Self { kind: ParamsKind::None }
    }

    /// The shared empty instance handed to handlers that run without route parameters.
    #[inline]
    pub fn empty_ref() -> &'static Params<'static, 'static> {
        &EMPTY
    }

    #[inline]
    pub fn len(&self) -> usize {
        match &self.kind {
            ParamsKind::None => 0,
            ParamsKind::List(list) => list.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the first value bound to `key`.
    #[inline]
    pub fn get(&self, key: impl AsRef<str>) -> Option<&'v str> {
        let key = key.as_ref();
        self.iter().find(|param| param.key == key).map(|param| param.value)
    }

    pub fn iter(&self) -> slice::Iter<'_, Param<'k, 'v>> {
        let list: &[Param<'k, 'v>] = match &self.kind {
            ParamsKind::None => &[],
            ParamsKind::List(list) => list,
        };
        list.iter()
    }

    pub(crate) fn push(&mut self, key: &'k str, value: &'v str) {
        let param = Param { key, value };
        match &mut self.kind {
            ParamsKind::None => self.kind = ParamsKind::List(vec![param]),
            ParamsKind::List(list) => list.push(param),
        }
    }

    /// Drops bindings made by a branch that failed to match.
    pub(crate) fn truncate(&mut self, len: usize) {
        if let ParamsKind::List(list) = &mut self.kind {
            list.truncate(len);
        }
    }
}

impl<'a, 'k, 'v> IntoIterator for &'a Params<'k, 'v> {
    type Item = &'a Param<'k, 'v>;
    type IntoIter = slice::Iter<'a, Param<'k, 'v>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
