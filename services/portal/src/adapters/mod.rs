pub mod local_store;
pub mod observer;

pub use local_store::LocalStore;
pub use observer::BroadcastObserver;
