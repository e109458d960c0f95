pub mod audit;
pub mod backup;
pub mod manager;
pub mod repository;
pub mod seed;
pub mod summary;

pub use manager::DomainState;
