mod allocator;
mod next_code;

pub use allocator::Allocator;
pub use next_code::{max_in_scope, next_child, next_code};
