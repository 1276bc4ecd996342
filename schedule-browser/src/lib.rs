use std::{ffi::OsStr, sync::Arc, time::Duration};

use anyhow::Context;
use athletic_scraping::schedule::session::{CalendarSession, EntryRef, SessionLauncher};
use headless_chrome::{
    browser::tab::{element::Element, NoElementFound},
    Browser, LaunchOptionsBuilder, Tab,
};
use log::{debug, info};
use url::Url;

const WINDOW_SIZE: (u32, u32) = (1920, 1080);

/// Starts a fresh headless Chrome for every calendar page.
pub struct ChromeLauncher {
    port: Option<u16>,
    element_timeout: Duration,
}
impl ChromeLauncher {
    pub fn new(port: Option<u16>, element_timeout: Duration) -> Self {
        Self {
            port,
            element_timeout,
        }
    }
}
impl SessionLauncher for ChromeLauncher {
    type Session = ChromeSession;

    fn launch(&mut self, url: &Url) -> anyhow::Result<ChromeSession> {
        let browser = Browser::new(
            LaunchOptionsBuilder::default()
                .headless(true)
                .sandbox(false)
                .port(self.port)
                .window_size(Some(WINDOW_SIZE))
                .args(vec![OsStr::new("--disable-dev-shm-usage")])
                .build()?,
        )
        .context("Failed to create browser")?;
        let tab = browser.new_tab()?;
        tab.set_default_timeout(self.element_timeout);
        info!("Opening {url}");
        tab.navigate_to(url.as_str())?.wait_until_navigated()?;
        Ok(ChromeSession {
            tab,
            _browser: browser,
        })
    }
}

/// Dropping the browser kills the Chrome process, so it must outlive the tab.
pub struct ChromeSession {
    tab: Arc<Tab>,
    _browser: Browser,
}
impl ChromeSession {
    fn with_element<T>(
        &self,
        entry: EntryRef,
        f: impl FnOnce(&Element) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let elements = self.tab.find_elements(entry.selector)?;
        let element = elements
            .get(entry.index)
            .with_context(|| format!("Element {entry:?} is gone"))?;
        f(element)
    }
}
impl CalendarSession for ChromeSession {
    fn count(&mut self, selector: &str) -> anyhow::Result<usize> {
        match self.tab.find_elements(selector) {
            Ok(elements) => Ok(elements.len()),
            Err(e) if e.downcast_ref::<NoElementFound>().is_some() => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn content(&mut self) -> anyhow::Result<String> {
        self.tab.get_content()
    }

    fn scroll_into_view(&mut self, entry: EntryRef) -> anyhow::Result<()> {
        self.with_element(entry, |element| {
            element.scroll_into_view()?;
            Ok(())
        })
    }

    fn is_clickable(&mut self, entry: EntryRef) -> anyhow::Result<bool> {
        self.with_element(entry, |element| {
            Ok(element
                .get_box_model()
                .map(|model| model.width > 0. && model.height > 0.)
                .unwrap_or(false))
        })
    }

    fn click(&mut self, entry: EntryRef) -> anyhow::Result<()> {
        self.with_element(entry, |element| {
            element.click()?;
            Ok(())
        })
    }

    fn force_click(&mut self, entry: EntryRef) -> anyhow::Result<()> {
        self.with_element(entry, |element| {
            element.call_js_fn("function() { this.click(); }", vec![], false)?;
            Ok(())
        })
    }

    fn dismiss(&mut self) -> anyhow::Result<()> {
        self.tab.evaluate("document.body.click();", false)?;
        Ok(())
    }

    fn close(self) -> anyhow::Result<()> {
        debug!("Closing {}", self.tab.get_url());
        self.tab.close(true)?;
        Ok(())
    }
}
