pub mod todo;
pub mod user;

pub use todo::{Completion, NewTodo, Priority, Todo, DEFAULT_CATEGORY};
pub use user::{NewUser, ResetState, User};
