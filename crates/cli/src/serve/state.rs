//! Application state and rate limiting.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use accounts_service::clients::{
    CompanyProfileClient, DocumentDownloader, DocumentGenerator, DocumentValidator, TransactionClient,
};
use accounts_service::{
    ClosureChain, CompanyAccountService, FilingOrchestrator, LinkRegistry, ServiceRegistry, SharedStore,
};

use super::RATE_LIMIT_WINDOW_SECS;

/// Per-IP request tracker: (request count, window start time).
type IpTracker = HashMap<IpAddr, (u64, Instant)>;

/// In-memory per-IP rate limiter with a fixed one-minute window.
///
/// Entries whose window has expired are swept at most once per window.
pub(crate) struct RateLimiter {
    tracker: Mutex<(IpTracker, Instant)>,
    pub(crate) max_requests: u64,
}

impl RateLimiter {
    pub(crate) fn new(max_requests: u64) -> Self {
        Self {
            tracker: Mutex::new((HashMap::new(), Instant::now())),
            max_requests,
        }
    }

    /// `Err(retry_after_secs)` once the IP has spent its budget for the window.
    pub(crate) async fn check(&self, ip: IpAddr) -> Result<(), u64> {
        self.check_at(ip, Instant::now()).await
    }

    async fn check_at(&self, ip: IpAddr, now: Instant) -> Result<(), u64> {
        let mut guard = self.tracker.lock().await;
        let (tracker, last_sweep) = &mut *guard;

        if now.saturating_duration_since(*last_sweep).as_secs() >= RATE_LIMIT_WINDOW_SECS {
            tracker.retain(|_, (_, start)| {
                now.saturating_duration_since(*start).as_secs() < RATE_LIMIT_WINDOW_SECS
            });
            *last_sweep = now;
        }

        let entry = tracker.entry(ip).or_insert((0, now));
        let elapsed = now.saturating_duration_since(entry.1).as_secs();
        if elapsed >= RATE_LIMIT_WINDOW_SECS {
            *entry = (0, now);
        }

        entry.0 += 1;
        if entry.0 > self.max_requests {
            Err(RATE_LIMIT_WINDOW_SECS.saturating_sub(elapsed))
        } else {
            Ok(())
        }
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.tracker.lock().await.0.len()
    }
}

/// Outbound collaborators the API depends on.
pub struct Clients {
    pub transactions: Arc<dyn TransactionClient>,
    pub profiles: Arc<dyn CompanyProfileClient>,
    pub generator: Arc<dyn DocumentGenerator>,
    pub downloader: Arc<dyn DocumentDownloader>,
    /// `None` when external document validation is disabled.
    pub validator: Option<Arc<dyn DocumentValidator>>,
}

/// Everything a handler needs, built once at start-up.
pub struct AppState {
    pub(crate) registry: ServiceRegistry,
    pub(crate) company_accounts: CompanyAccountService,
    pub(crate) closure: ClosureChain,
    pub(crate) filings: FilingOrchestrator,
    pub(crate) transactions: Arc<dyn TransactionClient>,
    pub(crate) rate_limiter: RateLimiter,
    /// `None` disables authentication.
    pub(crate) api_key: Option<String>,
}

impl AppState {
    pub fn new(store: SharedStore, clients: Clients, api_key: Option<String>, rate_limit: u64) -> Arc<Self> {
        let links = Arc::new(LinkRegistry::new(store.clone()));
        Arc::new(AppState {
            registry: ServiceRegistry::new(store.clone(), links),
            company_accounts: CompanyAccountService::new(store.clone(), clients.transactions.clone()),
            closure: ClosureChain::standard(store.clone(), clients.profiles),
            filings: FilingOrchestrator::new(store, clients.generator, clients.downloader, clients.validator),
            transactions: clients.transactions,
            rate_limiter: RateLimiter::new(rate_limit),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }
}
