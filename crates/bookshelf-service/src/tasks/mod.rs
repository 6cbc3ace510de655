//! Background tasks for the Bookshelf service.

pub mod token_cache_sweeper;

pub use token_cache_sweeper::start_token_cache_sweeper;
