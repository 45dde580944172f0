pub mod contrib;
pub mod nav_item;
pub mod post;
pub mod queue;
pub mod version;
