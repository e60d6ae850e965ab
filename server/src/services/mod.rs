pub mod publisher;

pub use publisher::{PublishError, TicketPublisher};
