mod contribution;
mod event;
mod participant;
mod plan;
mod user;

pub use contribution::Contribution;
pub use event::Event;
pub use participant::Participant;
pub use plan::SavingsPlan;
pub use user::User;

#[cfg(test)]
mod tests;
