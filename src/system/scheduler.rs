//! Cooperative continuation stack.
//!
//! A device without threads cannot block while waiting for a server. Work
//! that would normally be a blocking call is instead split into *steps*:
//! small, resumable units that are pushed on a stack and executed one at a
//! time by [`Scheduler::poll`].
//!
//! Each poll runs the step at the top of the stack exactly once. The step
//! itself decides what happens next:
//!
//! - **Pending**: it returns without touching the stack and is run again on
//!   the next poll.
//! - **Done**: it pops itself, optionally pushing a successor with
//!   [`Scheduler::replace`] or [`Scheduler::push`].
//!
//! Because the stack is LIFO, a nested wait pushed on top of an enclosing
//! step always completes before the enclosing step resumes, which is what
//! lets one stack emulate structured nested waits.
//!
//! ```text
//!   push(Complete)     push(Cleanup)      push(Wait)
//!  ┌──────────┐       ┌──────────┐       ┌──────────┐
//!  │ Complete │       │ Cleanup  │       │  Wait    │ ◀── poll() runs this
//!  └──────────┘       ├──────────┤       ├──────────┤
//!                     │ Complete │       │ Cleanup  │
//!                     └──────────┘       ├──────────┤
//!                                        │ Complete │
//!                                        └──────────┘
//! ```

use heapless::Vec;

/// The context a step runs against.
///
/// The scheduler only stores step tags; everything a step needs to do its
/// work lives in the type implementing this trait.
pub trait Resume<S, const N: usize> {
    /// Run `step`, which is currently the top of `steps`.
    ///
    /// A finished step must remove itself with [`Scheduler::pop`] or
    /// [`Scheduler::replace`]; a pending step leaves `steps` untouched.
    fn resume(&mut self, step: S, steps: &mut Scheduler<S, N>);
}

/// A fixed-capacity LIFO stack of resumable steps.
#[derive(Debug, Clone)]
pub struct Scheduler<S, const N: usize> {
    stack: Vec<S, N>,
}

impl<S: Copy, const N: usize> Scheduler<S, N> {
    /// Creates an empty scheduler.
    pub const fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Pushes a step on top of the stack.
    ///
    /// Returns the step back if the stack is full.
    pub fn push(&mut self, step: S) -> Result<(), S> {
        self.stack.push(step)
    }

    /// Removes and returns the top step.
    pub fn pop(&mut self) -> Option<S> {
        self.stack.pop()
    }

    /// Replaces the top step with its successor.
    ///
    /// Returns the step that was removed. On an empty stack the successor is
    /// simply pushed.
    pub fn replace(&mut self, successor: S) -> Option<S> {
        let previous = self.stack.pop();
        // A slot was just freed, or the stack was empty.
        let _ = self.stack.push(successor);
        previous
    }

    /// Returns the top step without removing it.
    pub fn top(&self) -> Option<S> {
        self.stack.last().copied()
    }

    /// Returns the step at the bottom of the stack, the one that will run
    /// last.
    pub fn bottom(&self) -> Option<S> {
        self.stack.first().copied()
    }

    /// Number of steps currently scheduled.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns `true` when no step is scheduled.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Maximum number of steps the stack can hold.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drops every scheduled step.
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Runs the top step once against `ctx`.
    ///
    /// Returns `false` without doing anything when the stack is empty.
    pub fn poll<R: Resume<S, N>>(&mut self, ctx: &mut R) -> bool {
        match self.top() {
            Some(step) => {
                ctx.resume(step, self);
                true
            }
            None => false,
        }
    }
}

impl<S: Copy, const N: usize> Default for Scheduler<S, N> {
    fn default() -> Self {
        Self::new()
    }
}
