use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Cooperative pause/stop handle shared between a front end and a run
///
/// Cloning the handle is cheap; every clone observes and drives the same
/// signals. The controller checks it between frontier entries and each
/// worker checks it before starting a new request.
///
/// Stop always wins over pause: a stopped run never blocks on the gate.
#[derive(Debug, Clone)]
pub struct CrawlControl {
    stop: CancellationToken,
    paused: Arc<watch::Sender<bool>>,
}

impl CrawlControl {
    /// Creates a handle in the running (not paused, not stopped) state
    pub fn new() -> Self {
        let (paused, _) = watch::channel(false);
        Self {
            stop: CancellationToken::new(),
            paused: Arc::new(paused),
        }
    }

    /// Closes the pause gate
    pub fn pause(&self) {
        self.paused.send_replace(true);
    }

    /// Opens the pause gate
    pub fn resume(&self) {
        self.paused.send_replace(false);
    }

    /// Signals the run to stop at the next yield point
    pub fn stop(&self) {
        self.stop.cancel();
    }

    pub fn is_paused(&self) -> bool {
        *self.paused.borrow()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Blocks while the gate is closed
    ///
    /// # Returns
    ///
    /// * `true` - The gate is open and the caller may proceed
    /// * `false` - A stop was signaled; the caller should wind down
    pub async fn wait_while_paused(&self) -> bool {
        if self.is_stopped() {
            return false;
        }

        let mut gate = self.paused.subscribe();
        tokio::select! {
            _ = self.stop.cancelled() => false,
            opened = async { gate.wait_for(|paused| !*paused).await.is_ok() } => {
                opened && !self.is_stopped()
            }
        }
    }

    /// Resolves once the gate closes or a stop is signaled
    pub async fn paused_or_stopped(&self) {
        let mut gate = self.paused.subscribe();
        tokio::select! {
            _ = self.stop.cancelled() => {}
            _ = async { gate.wait_for(|paused| *paused).await.is_ok() } => {}
        }
    }
}

impl Default for CrawlControl {
    fn default() -> Self {
        Self::new()
    }
}
