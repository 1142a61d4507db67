pub mod days;
pub mod pool;
pub mod users;

pub use pool::create_pool;
