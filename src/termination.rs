use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use faktor_core::termination::Terminator;

/// Stops the search once SIGINT has been received. If installing the signal
/// handler fails, the terminator simply never fires.
pub struct SignalTerminator {
    received: Option<Arc<AtomicBool>>,
}

impl SignalTerminator {
    pub fn register() -> SignalTerminator {
        let received = Arc::new(AtomicBool::new(false));

        let registered =
            signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&received));

        SignalTerminator {
            received: registered.is_ok().then_some(received),
        }
    }
}

impl Terminator for SignalTerminator {
    fn should_stop(&self) -> bool {
        self.received
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Composes two terminators; the search stops when either one fires.
pub struct OrTerminator<A, B>(pub A, pub B);

impl<A: Terminator, B: Terminator> Terminator for OrTerminator<A, B> {
    fn should_stop(&self) -> bool {
        self.0.should_stop() || self.1.should_stop()
    }
}
