//! Roster pages are static, so a plain HTTP client is enough.
//!
//! Only fetching and parsing is done for now; no roster fields are extracted.

use anyhow::Context;
use log::{error, info};
use reqwest::header;
use scraper::Html;
use url::Url;

use crate::{
    database::Connector,
    team::{Season, SeasonMatrix, Sport, TeamPage},
};

#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch(&self, url: &Url) -> anyhow::Result<String>;
}

pub struct ReqwestFetcher {
    client: reqwest::Client,
}
impl ReqwestFetcher {
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers(
                [(header::ACCEPT, header::HeaderValue::from_static("text/html"))]
                    .into_iter()
                    .collect(),
            )
            .build()?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url) -> anyhow::Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

pub struct RosterPage {
    pub sport: Sport,
    pub season: Season,
    pub document: Html,
}

/// Fetches the page of every sport/season in order.
///
/// Returns nothing if the database is unreachable, and stops at the first page
/// that cannot be fetched, returning what was fetched until then.
pub async fn update_roster<F: PageFetcher, C: Connector>(
    fetcher: &F,
    connector: &C,
    team: &TeamPage,
    matrix: &SeasonMatrix,
) -> Vec<RosterPage> {
    info!("===Updating track and field roster===");
    if let Err(e) = connector.connect().await {
        error!("Error connecting to the database: {e}");
        return vec![];
    }

    let mut pages = vec![];
    for (sport, season) in matrix.iter() {
        let fetched = async {
            let url = team.calendar_url(sport, season)?;
            let body = fetcher
                .fetch(&url)
                .await
                .with_context(|| format!("While fetching {url}"))?;
            anyhow::Ok(Html::parse_document(&body))
        }
        .await;
        match fetched {
            Ok(document) => {
                info!("Fetched roster page for {sport} {season}");
                pages.push(RosterPage {
                    sport,
                    season,
                    document,
                });
            }
            Err(e) => {
                error!("Error fetching the roster page: {e:#}");
                break;
            }
        }
    }
    pages
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use anyhow::bail;
    use itertools::Itertools;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };
    use url::Url;

    use super::{update_roster, PageFetcher, ReqwestFetcher};
    use crate::{
        database::{Connector, DatabaseError},
        team::{Season, SeasonMatrix, Sport, TeamPage},
    };

    struct FakeFetcher {
        requested: RefCell<Vec<String>>,
        fail_on: Option<usize>,
    }
    impl FakeFetcher {
        fn new(fail_on: Option<usize>) -> Self {
            Self {
                requested: RefCell::new(vec![]),
                fail_on,
            }
        }
    }
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &Url) -> anyhow::Result<String> {
            let n = {
                let mut requested = self.requested.borrow_mut();
                requested.push(url.to_string());
                requested.len() - 1
            };
            if self.fail_on == Some(n) {
                bail!("connection reset");
            }
            Ok(format!("<html><head><title>{url}</title></head></html>"))
        }
    }

    struct StaticConnector(bool);
    impl Connector for StaticConnector {
        async fn connect(&self) -> Result<(), DatabaseError> {
            if self.0 {
                Ok(())
            } else {
                Err(DatabaseError::MissingUrl("MONGODB_URL".into()))
            }
        }
    }

    #[tokio::test]
    async fn fetches_every_combination() {
        let fetcher = FakeFetcher::new(None);
        let pages = update_roster(
            &fetcher,
            &StaticConnector(true),
            &TeamPage::default(),
            &SeasonMatrix::default(),
        )
        .await;
        assert_eq!(pages.len(), 6);
        assert_eq!(
            pages.iter().map(|p| (p.sport, p.season)).collect_vec(),
            SeasonMatrix::default().iter().collect_vec()
        );
        assert_eq!(
            fetcher.requested.borrow()[5],
            "https://www.athletic.net/team/19718/track-and-field-indoor/2026"
        );
    }

    #[tokio::test]
    async fn database_failure_aborts() {
        let fetcher = FakeFetcher::new(None);
        let pages = update_roster(
            &fetcher,
            &StaticConnector(false),
            &TeamPage::default(),
            &SeasonMatrix::default(),
        )
        .await;
        assert!(pages.is_empty());
        assert!(fetcher.requested.borrow().is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_stops_early() {
        let fetcher = FakeFetcher::new(Some(2));
        let pages = update_roster(
            &fetcher,
            &StaticConnector(true),
            &TeamPage::default(),
            &SeasonMatrix::default(),
        )
        .await;
        assert_eq!(pages.len(), 2);
        assert_eq!(fetcher.requested.borrow().len(), 3);
        assert_eq!(pages[1].sport, Sport::CrossCountry);
        assert_eq!(pages[1].season, Season::from(2026));
    }

    async fn serve_once(status_line: &'static str, body: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "{status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        Url::parse(&format!("http://{addr}/")).unwrap()
    }

    fn local_fetcher() -> ReqwestFetcher {
        ReqwestFetcher::from_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn reqwest_fetcher_reads_body() {
        let base = serve_once("HTTP/1.1 200 OK", "<html><body>Roster</body></html>").await;
        let fetcher = local_fetcher();
        let body = fetcher.fetch(&base).await.unwrap();
        assert!(body.contains("Roster"));
    }

    #[tokio::test]
    async fn reqwest_fetcher_rejects_error_status() {
        let base = serve_once("HTTP/1.1 404 Not Found", "missing").await;
        let fetcher = local_fetcher();
        assert!(fetcher.fetch(&base).await.is_err());
    }

    #[tokio::test]
    async fn against_local_server() {
        let base = serve_once("HTTP/1.1 200 OK", "<html></html>").await;
        let fetcher = local_fetcher();
        let pages = update_roster(
            &fetcher,
            &StaticConnector(true),
            &TeamPage::new(base, 19718.into()),
            &SeasonMatrix::new(vec![Sport::TrackAndFieldOutdoor], vec![Season::from(2025)]),
        )
        .await;
        assert_eq!(pages.len(), 1);
    }
}
