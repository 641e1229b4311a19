//! Announcement Dispatch
//!
//! Hands finished live region text to the speech/output side.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Downstream consumer of announcement text
pub trait OutputSink {
    fn speak(&mut self, text: &str);
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn speak(&mut self, text: &str) {
        (**self).speak(text);
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Rc<RefCell<S>> {
    fn speak(&mut self, text: &str) {
        self.borrow_mut().speak(text);
    }
}

/// Adapts a closure into a sink
pub struct CallbackSink<F>(pub F);

impl<F: FnMut(&str)> OutputSink for CallbackSink<F> {
    fn speak(&mut self, text: &str) {
        (self.0)(text);
    }
}

/// Forward `text` when it holds anything but whitespace.
/// Returns whether the sink was called.
pub fn dispatch<S: OutputSink + ?Sized>(sink: &mut S, text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    sink.speak(text);
    true
}

/// Bounded FIFO of announcements; the oldest entry is dropped when full
#[derive(Debug, Default)]
pub struct AnnouncementQueue {
    queue: VecDeque<String>,
    max_size: usize,
}

impl AnnouncementQueue {
    pub fn new(max_size: usize) -> Self { Self { queue: VecDeque::new(), max_size } }

    pub fn enqueue(&mut self, text: impl Into<String>) {
        self.queue.push_back(text.into());
        while self.queue.len() > self.max_size { self.queue.pop_front(); }
    }

    pub fn dequeue(&mut self) -> Option<String> { self.queue.pop_front() }
    pub fn peek(&self) -> Option<&str> { self.queue.front().map(String::as_str) }
    pub fn clear(&mut self) { self.queue.clear(); }
    pub fn is_empty(&self) -> bool { self.queue.is_empty() }
    pub fn len(&self) -> usize { self.queue.len() }
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.queue.iter().map(String::as_str) }
}

impl OutputSink for AnnouncementQueue {
    fn speak(&mut self, text: &str) {
        self.enqueue(text);
    }
}
