pub mod ack;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use ack::{DeleteAck, InsertAck, UpdateAck};
pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{DonorRepository, RequestRepository};
