//! Latest-requested-wins output slot for location runs.
//!
//! Runs may overlap when the address changes while a lookup is in flight.
//! Each run is tagged with a generation from [`LocationSlot::begin`] and only
//! the newest generation is allowed to write.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::location::LocationRecord;
use super::pipeline::LocationResolver;

pub struct LocationSlot {
    generation: Mutex<u64>,
    value_tx: watch::Sender<Option<LocationRecord>>,
}

impl Default for LocationSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationSlot {
    pub fn new() -> Self {
        let (value_tx, _) = watch::channel(None);
        Self {
            generation: Mutex::new(0),
            value_tx,
        }
    }

    /// Issue the next generation; older ones become stale
    pub fn begin(&self) -> u64 {
        let mut generation = self.generation.lock();
        *generation += 1;
        *generation
    }

    /// Write `value` if `generation` is still the newest one issued
    pub fn publish(&self, generation: u64, value: Option<LocationRecord>) -> bool {
        let latest = self.generation.lock();
        if *latest != generation {
            log::debug!(
                "Discarding stale location (generation {}, latest {})",
                generation,
                *latest
            );
            return false;
        }

        self.value_tx.send_replace(value);
        true
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<LocationRecord>> {
        self.value_tx.subscribe()
    }

    pub fn current(&self) -> Option<LocationRecord> {
        self.value_tx.borrow().clone()
    }
}

/// Re-runs the location pipeline whenever the default address changes
pub struct LocationWatcher {
    resolver: LocationResolver,
    slot: Arc<LocationSlot>,
}

impl LocationWatcher {
    pub fn new(resolver: LocationResolver, slot: Arc<LocationSlot>) -> Self {
        Self { resolver, slot }
    }

    /// Watch `address_rx` until `cancel` fires or the sender is dropped
    pub async fn run(
        self,
        mut address_rx: watch::Receiver<Option<String>>,
        cancel: CancellationToken,
    ) {
        loop {
            let address = address_rx.borrow_and_update().clone();
            self.request(address, &cancel);

            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = address_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        log::debug!("Location watcher stopped");
    }

    fn request(&self, address: Option<String>, cancel: &CancellationToken) {
        let generation = self.slot.begin();

        let Some(address) = address else {
            self.slot.publish(generation, None);
            return;
        };

        log::debug!("Locating {} (generation {})", address, generation);

        let resolver = self.resolver.clone();
        let slot = Arc::clone(&self.slot);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Some(record) = resolver.resolve(Some(&address), &cancel).await {
                slot.publish(generation, Some(record));
            }
        });
    }
}
