use std::cell::RefCell;
use std::collections::HashMap;

use super::PairKey;

/// Reports whether both editors of a pair are still alive
pub(super) type Liveness = Box<dyn Fn() -> bool>;

thread_local! {
    // Every relay on this thread shares one view of which pairs are wired
    static LIVE_PAIRS: RefCell<HashMap<PairKey, Liveness>> = RefCell::new(HashMap::new());
}

/// Records `key` as wired. Returns false if the pair already is.
pub(super) fn claim(key: PairKey, alive: Liveness) -> bool {
    LIVE_PAIRS.with(|pairs| {
        let mut pairs = pairs.borrow_mut();
        prune(&mut pairs);
        if pairs.contains_key(&key) {
            return false;
        }
        pairs.insert(key, alive);
        true
    })
}

pub(super) fn release(key: PairKey) {
    // The registry may already be gone when a connection is dropped during thread teardown
    let _ = LIVE_PAIRS.try_with(|pairs| {
        pairs.borrow_mut().remove(&key);
    });
}

pub(super) fn contains(key: PairKey) -> bool {
    LIVE_PAIRS.with(|pairs| {
        let mut pairs = pairs.borrow_mut();
        prune(&mut pairs);
        pairs.contains_key(&key)
    })
}

/// Forgets pairs where either editor has been dropped
fn prune(pairs: &mut HashMap<PairKey, Liveness>) {
    pairs.retain(|key, alive| {
        let keep = alive();
        if !keep {
            log::debug!("relay {} <-> {} released, an editor is gone", key.0, key.1);
        }
        keep
    });
}
