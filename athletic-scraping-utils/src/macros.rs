/// Parses a CSS selector once per call site and caches it for the lifetime of the program.
///
/// Only pass string literals or constants: the cache is keyed by the call site,
/// not by the value.
#[macro_export]
macro_rules! selector {
    ($e: expr) => {{
        use ::once_cell::sync::Lazy;
        use ::scraper::Selector;
        static SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse($e).unwrap());
        &*SELECTOR
    }};
}
