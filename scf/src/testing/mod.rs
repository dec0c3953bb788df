//! Testing utilities for scf.

#![allow(dead_code)]

pub mod synthetic;

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
#[cfg(test)]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Counts WARN events seen by the subscriber it is installed in.
///
/// ```rust,ignore
/// let warnings = WarnCounter::default();
/// tracing::subscriber::with_default(warnings.subscriber(), || do_work());
/// assert_eq!(warnings.count(), 1);
/// ```
#[cfg(test)]
#[derive(Clone, Default)]
pub struct WarnCounter(std::sync::Arc<std::sync::atomic::AtomicUsize>);

#[cfg(test)]
impl WarnCounter {
    pub fn count(&self) -> usize {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Registry with this counter as its only layer.
    pub fn subscriber(
        &self,
    ) -> tracing_subscriber::layer::Layered<WarnCounter, tracing_subscriber::Registry> {
        use tracing_subscriber::layer::SubscriberExt;
        tracing_subscriber::registry().with(self.clone())
    }
}

#[cfg(test)]
impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }
}
