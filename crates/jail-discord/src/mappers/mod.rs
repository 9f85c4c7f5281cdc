//! Model to entity mappers
//!
//! - `From<Model> for Entity`: convert REST payloads to domain objects
//! - `*_from_model` functions where the payload lacks the owning guild id
//! - `From<&OutgoingMessage>`: prepare outbound message bodies

mod channel;
mod member;
mod message;
mod profile;
mod role;

pub use member::member_from_model;
pub use role::role_from_model;
