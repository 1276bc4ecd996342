use url::Url;

/// The `index`-th element matched by `selector` on the live page.
///
/// Elements are looked up again on every use, so a re-render between
/// interactions does not leave us holding a detached node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EntryRef<'a> {
    pub selector: &'a str,
    pub index: usize,
}

/// A rendered calendar page that can be interacted with.
pub trait CalendarSession {
    /// Number of elements currently matching `selector`.
    fn count(&mut self, selector: &str) -> anyhow::Result<usize>;
    /// Serialized DOM as currently rendered.
    fn content(&mut self) -> anyhow::Result<String>;
    fn scroll_into_view(&mut self, entry: EntryRef) -> anyhow::Result<()>;
    /// Whether the element is laid out and can receive a click.
    fn is_clickable(&mut self, entry: EntryRef) -> anyhow::Result<bool>;
    fn click(&mut self, entry: EntryRef) -> anyhow::Result<()>;
    /// Clicks from script, bypassing whatever overlay intercepted [`Self::click`].
    fn force_click(&mut self, entry: EntryRef) -> anyhow::Result<()>;
    /// Clicks on the page body to collapse the expanded entry.
    fn dismiss(&mut self) -> anyhow::Result<()>;
    fn close(self) -> anyhow::Result<()>;
}

/// Opens one browser session per calendar page.
pub trait SessionLauncher {
    type Session: CalendarSession;
    fn launch(&mut self, url: &Url) -> anyhow::Result<Self::Session>;
}
