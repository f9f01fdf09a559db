pub mod hardware;
pub mod persisted;
