use super::traits::QuoteProvider;
use super::yahoo_finance::YahooFinanceProvider;

/// Registry of quote providers, tried in registration order.
///
/// The first provider to return a usable quote wins; later entries act
/// as fallbacks. New sources can be added without modifying existing
/// code.
pub struct QuoteProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the default providers pre-configured.
    /// Yahoo Finance is the primary (and currently only) quote source;
    /// it needs no API key.
    pub fn new_with_defaults() -> Self {
        let mut registry = Self::new();
        if let Ok(yahoo) = YahooFinanceProvider::new() {
            registry.register(Box::new(yahoo));
        }
        registry
    }

    /// Register a quote provider. Registration order is priority order.
    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    /// All registered providers, in priority order.
    pub fn providers(&self) -> &[Box<dyn QuoteProvider>] {
        &self.providers
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for QuoteProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
