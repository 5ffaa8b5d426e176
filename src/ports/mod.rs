//! Ports (trait boundaries) for external collaborators.
//!
//! The trainer, the persisted table and training observation each sit
//! behind a trait owned by this crate. Concrete implementations live in
//! [`crate::grid`], [`crate::adapters`] and [`crate::pipeline::observers`].

pub mod environment;
pub mod observer;
pub mod repository;

pub use environment::Environment;
pub use observer::TrainingObserver;
pub use repository::TableRepository;
