//! Input/output: message types, sweep emission, and serialized dispatch.

pub mod dispatch;
pub mod emitter;
pub mod messages;

pub use dispatch::RegistrationWorker;
