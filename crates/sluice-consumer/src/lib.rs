pub mod config;
pub mod strategy;
pub mod window;
pub mod committer;
pub mod consumer;
pub mod cursors;

pub use config::ConsumerConfig;
pub use strategy::CommitStrategy;
pub use window::CursorWindow;
pub use committer::Committer;
pub use consumer::SubscriptionConsumer;
pub use cursors::CursorCalculator;
