//! Environments: persistent frame chains with shared mutable cells.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::runtime::Value;

/// A single binding: a name and its mutable value cell
struct Frame {
    name: String,
    cell: RefCell<Value>,
    next: Option<Rc<Frame>>,
}

/// A lexical environment.
///
/// A persistent linked list of frames. [`Env::extend`] prepends a fresh
/// frame and leaves the original chain untouched, so extension is cheap and
/// never invalidates other references. Chains that share a suffix share
/// those frames' cells: [`Env::modify`] through one alias is visible
/// through every other. That sharing is what makes `set!` on a captured
/// variable visible inside a closure.
#[derive(Clone, Default)]
pub struct Env {
    head: Option<Rc<Frame>>,
}

impl Env {
    /// The empty environment
    pub fn empty() -> Self {
        Env { head: None }
    }

    /// Returns a new environment with a fresh binding prepended
    #[must_use]
    pub fn extend(&self, name: impl Into<String>, value: Value) -> Env {
        Env {
            head: Some(Rc::new(Frame {
                name: name.into(),
                cell: RefCell::new(value),
                next: self.head.clone(),
            })),
        }
    }

    /// The value of the first binding with this name, if any
    pub fn find(&self, name: &str) -> Option<Value> {
        self.frames()
            .find(|frame| frame.name == name)
            .map(|frame| frame.cell.borrow().clone())
    }

    /// Writes into the first matching cell in place.
    ///
    /// Returns whether a cell was written; when the name is unbound this is
    /// a no-op and callers are expected to have extended first.
    pub fn modify(&self, name: &str, value: Value) -> bool {
        match self.frames().find(|frame| frame.name == name) {
            Some(frame) => {
                *frame.cell.borrow_mut() = value;
                true
            }
            None => false,
        }
    }

    fn frames(&self) -> Frames<'_> {
        Frames {
            next: self.head.as_deref(),
        }
    }
}

struct Frames<'a> {
    next: Option<&'a Frame>,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a Frame;

    fn next(&mut self) -> Option<&'a Frame> {
        let frame = self.next?;
        self.next = frame.next.as_deref();
        Some(frame)
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.frames().map(|frame| &frame.name))
            .finish()
    }
}
