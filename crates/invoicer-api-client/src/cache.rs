use invoicer_core::models::InvoiceRecord;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

const DEFAULT_CAPACITY: usize = 128;

/// Transient cache of invoice details keyed by invoice id.
///
/// Bounded LRU; nothing is persisted. A poisoned lock behaves as an empty
/// cache.
#[derive(Debug)]
pub struct InvoiceCache {
    entries: Mutex<LruCache<String, InvoiceRecord>>,
}

impl InvoiceCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, invoice_id: &str) -> Option<InvoiceRecord> {
        let mut entries = self.entries.lock().ok()?;
        entries.get(invoice_id).cloned()
    }

    pub fn put(&self, record: InvoiceRecord) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(record.invoice_id.clone(), record);
        }
    }

    pub fn invalidate(&self, invoice_id: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.pop(invoice_id);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InvoiceCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
