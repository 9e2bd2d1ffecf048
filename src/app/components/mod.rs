pub mod chatbot;
pub mod gallery;
pub mod readiness_badge;
pub mod test_card;

pub use chatbot::Chatbot;
pub use gallery::Gallery;
pub use readiness_badge::ReadinessBadge;
pub use test_card::TestCard;
