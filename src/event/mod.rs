mod bus;

pub use bus::{EventBus, Listener, Subscription};
