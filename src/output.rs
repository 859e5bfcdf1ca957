//! Layered output sink used while a component renders.
//!
//! The base layer collects the component's HTML. Opening a script block
//! pushes a fresh layer so everything written until the block closes is
//! captured separately; closing it pops the layer and writing resumes on
//! the one below.

use std::fmt;

#[derive(Debug)]
pub struct OutputStack {
    /// `layers[0]` is the base and is never popped.
    layers: Vec<String>,
}

impl OutputStack {
    pub fn new() -> Self {
        Self {
            layers: vec![String::new()],
        }
    }

    /// Append to the innermost layer.
    pub fn push_str(&mut self, s: &str) {
        if let Some(top) = self.layers.last_mut() {
            top.push_str(s);
        }
    }

    /// Open a capture layer.
    pub fn open(&mut self) {
        self.layers.push(String::new());
    }

    /// Close the innermost capture layer and return what it collected.
    ///
    /// `None` when only the base layer is left.
    pub fn close(&mut self) -> Option<String> {
        if self.layers.len() > 1 {
            self.layers.pop()
        } else {
            None
        }
    }

    /// Number of open capture layers above the base.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Discard every capture layer and return the base content.
    pub fn into_base(mut self) -> String {
        self.layers.truncate(1);
        self.layers.pop().unwrap_or_default()
    }
}

impl Default for OutputStack {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for OutputStack {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_layers_capture_separately() {
        let mut out = OutputStack::new();
        out.push_str("<p>");
        out.open();
        write!(out, "x = {}", 1).unwrap();
        assert_eq!(out.depth(), 1);
        assert_eq!(out.close().as_deref(), Some("x = 1"));
        out.push_str("</p>");
        assert_eq!(out.into_base(), "<p></p>");
    }

    #[test]
    fn test_base_never_closes() {
        let mut out = OutputStack::new();
        out.push_str("keep");
        assert_eq!(out.close(), None);
        assert_eq!(out.depth(), 0);
        assert_eq!(out.into_base(), "keep");
    }

    #[test]
    fn test_into_base_drops_open_layers() {
        let mut out = OutputStack::new();
        out.push_str("a");
        out.open();
        out.push_str("lost");
        out.open();
        assert_eq!(out.into_base(), "a");
    }
}
