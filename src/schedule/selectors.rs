use anyhow::anyhow;
use log::debug;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Calendar rows that expand when clicked, most specific first.
pub static ENTRY_SELECTORS: Lazy<SelectorChain> = Lazy::new(|| {
    SelectorChain::new(&[
        "div.px-2.w-100.d-flex.pointer",
        "div[class*='px-2'][class*='pointer']",
        "div.cal-item[class*='ng-tns']",
        "[class*='cal-item'][class*='ng-star-inserted']",
    ])
});

/// Calendar items in their expanded state.
pub static OPEN_EVENT_SELECTORS: Lazy<SelectorChain> = Lazy::new(|| {
    SelectorChain::new(&[
        "div.cal-item.ng-tns-c342766986-3.ng-star-inserted.item-open",
        r#"div[class*="item-open"]"#,
        r#"div[class*="cal-item"][class*="item-open"]"#,
    ])
});

pub struct Pattern {
    pub css: &'static str,
    pub selector: Selector,
}

/// An ordered list of selectors; the first one that matches anything wins.
pub struct SelectorChain {
    patterns: Vec<Pattern>,
}
impl SelectorChain {
    /// Patterns that fail to parse are dropped with a log line.
    pub fn new(patterns: &[&'static str]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|&css| match parse_selector(css) {
                Ok(selector) => Some(Pattern { css, selector }),
                Err(e) => {
                    log::warn!("Dropping selector {css:?}: {e}");
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Selects with each pattern in order against a parsed document.
    pub fn first_match<'a>(&'a self, html: &'a Html) -> Option<(&'a Pattern, Vec<ElementRef<'a>>)> {
        self.patterns.iter().find_map(|pattern| {
            let found: Vec<_> = html.select(&pattern.selector).collect();
            if found.is_empty() {
                None
            } else {
                debug!("Found {} element(s) with selector: {}", found.len(), pattern.css);
                Some((pattern, found))
            }
        })
    }

    /// Whether any pattern matches `element` itself.
    pub fn matches(&self, element: &ElementRef) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.selector.matches(element))
    }

    /// Same as [`Self::first_match`], but asks `count` (typically a live page)
    /// instead of a parsed document.  Errors are logged and skip to the next pattern.
    pub fn first_counted(
        &self,
        mut count: impl FnMut(&str) -> anyhow::Result<usize>,
    ) -> Option<(&Pattern, usize)> {
        self.patterns.iter().find_map(|pattern| match count(pattern.css) {
            Ok(0) => None,
            Ok(n) => {
                debug!("Found {n} element(s) with selector: {}", pattern.css);
                Some((pattern, n))
            }
            Err(e) => {
                debug!("Selector {} failed: {e:#}", pattern.css);
                None
            }
        })
    }
}

fn parse_selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("{e:?}"))
}

#[cfg(test)]
mod tests {
    use anyhow::bail;
    use scraper::Html;

    use super::{SelectorChain, ENTRY_SELECTORS, OPEN_EVENT_SELECTORS};

    #[test]
    fn builtin_chains_parse() {
        assert_eq!(ENTRY_SELECTORS.patterns().len(), 4);
        assert_eq!(OPEN_EVENT_SELECTORS.patterns().len(), 3);
    }

    #[test]
    fn invalid_patterns_are_dropped() {
        let chain = SelectorChain::new(&["div..broken[", "span.title"]);
        assert_eq!(chain.patterns().len(), 1);
        assert_eq!(chain.patterns()[0].css, "span.title");
    }

    #[test]
    fn earlier_pattern_wins() {
        let html = Html::parse_document(
            r#"<div class="cal-item ng-tns-c1 ng-star-inserted">
                 <div class="px-2 w-100 d-flex pointer">A</div>
               </div>
               <div class="cal-item ng-tns-c1 ng-star-inserted">
                 <div class="px-2 w-100 d-flex pointer">B</div>
               </div>"#,
        );
        let (pattern, found) = ENTRY_SELECTORS.first_match(&html).unwrap();
        assert_eq!(pattern.css, "div.px-2.w-100.d-flex.pointer");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn falls_back_to_later_pattern() {
        let html = Html::parse_document(
            r#"<div class="cal-item ng-tns-c9 ng-star-inserted">A</div>"#,
        );
        let (pattern, _) = ENTRY_SELECTORS.first_match(&html).unwrap();
        assert_eq!(pattern.css, "div.cal-item[class*='ng-tns']");
    }

    #[test]
    fn matches_the_element_itself() {
        let html = Html::parse_document(
            r#"<div class="cal-item ng-star-inserted item-open"><span>A</span></div>"#,
        );
        let (_, items) = OPEN_EVENT_SELECTORS.first_match(&html).unwrap();
        assert!(OPEN_EVENT_SELECTORS.matches(&items[0]));
        let span = items[0].children().find_map(scraper::ElementRef::wrap).unwrap();
        assert!(!OPEN_EVENT_SELECTORS.matches(&span));
    }

    #[test]
    fn no_match() {
        let html = Html::parse_document("<p>Nothing scheduled</p>");
        assert!(ENTRY_SELECTORS.first_match(&html).is_none());
    }

    #[test]
    fn counted_skips_failures_and_empties() {
        let mut asked = vec![];
        let found = ENTRY_SELECTORS.first_counted(|css| {
            asked.push(css.to_owned());
            match asked.len() {
                1 => bail!("stale"),
                2 => Ok(0),
                _ => Ok(5),
            }
        });
        let (pattern, n) = found.unwrap();
        assert_eq!(pattern.css, "div.cal-item[class*='ng-tns']");
        assert_eq!(n, 5);
        assert_eq!(asked.len(), 3);
    }
}
