//! TodoMaster: an in-memory task manager. Tasks are composed in a form,
//! committed to an ordered list and shown as cards; every change publishes
//! a new immutable snapshot that views redraw from.

#[macro_use]
extern crate prettytable;

pub mod cli;
pub mod interface;
pub mod model;
pub mod store;
pub mod tasks;

pub use model::{Field, Notice, Priority, Task, TaskError, TaskId};
pub use store::{State, Store};
pub use tasks::TaskList;
