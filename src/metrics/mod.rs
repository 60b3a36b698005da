pub mod fanout;
pub mod summary;

pub use summary::GraphStats;
