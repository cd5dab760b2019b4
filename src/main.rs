mod clock;
mod lifecycle;
mod model;
mod nav;
mod page;
mod store;
mod util;
mod view;

use nav::Navigator;
use store::HttpSource;
use tracing_subscriber::EnvFilter;
use url::Url;
use util::fmt_ts;
use view::{DisplayState, LinkHistory};

struct Config {
    endpoint: Url,
    origin: Url,
    page_size: usize,
}

impl Config {
    fn from_env() -> Self {
        let endpoint = std::env::var("SHORTLIST_ENDPOINT")
            .unwrap_or_else(|_| "https://go.shortl.ist/v1/links".to_string());
        let endpoint = Url::parse(&endpoint).expect("SHORTLIST_ENDPOINT");
        let origin = std::env::var("SHORTLIST_ORIGIN")
            .unwrap_or_else(|_| "https://go.shortl.ist".to_string());
        let origin = Url::parse(&origin).expect("SHORTLIST_ORIGIN");
        let page_size = std::env::var("SHORTLIST_PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(page::DEFAULT_PAGE_SIZE);
        Self {
            endpoint,
            origin,
            page_size,
        }
    }
}

/// Stand-in for the hosting application's router: in-app transitions and
/// full navigations are announced instead of performed.
struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn route(&mut self, path: &str) {
        println!("=> in-app route to {path}");
    }

    fn assign(&mut self, url: &str) {
        println!("=> full navigation to {url}");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .without_time()
        .init();

    let cfg = Config::from_env();
    let mut history = LinkHistory::new(
        HttpSource::new(cfg.endpoint),
        cfg.origin,
        cfg.page_size,
    );
    let mut navigator = StdoutNavigator;

    render(&history); // first-paint skeleton
    history.refresh().await;
    render(&history);

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        let (cmd, arg) = match input.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (input, ""),
        };
        match cmd {
            "q" => break,
            "r" => {
                history.refresh().await;
            }
            "n" => history.next_page(),
            "p" => history.prev_page(),
            "o" => {
                if let Some(id) = row_id(&history, arg) {
                    history.observe(&id);
                    live_countdown(&history, &id, 3).await;
                }
            }
            "u" => {
                if let Some(id) = row_id(&history, arg) {
                    history.unobserve(&id);
                }
            }
            "go" => {
                match row_id(&history, arg).and_then(|id| history.activate(&id)) {
                    Some(dispatch) => dispatch.send_to(&mut navigator),
                    None => println!("link is expired or unknown"),
                }
            }
            "" => {}
            _ => {
                println!("commands: r (reload), n/p (page), o/u <row> (watch), go <row>, q");
                continue;
            }
        }
        render(&history);
    }
}

/// Echo a few live countdown updates for a freshly observed row. The row
/// stays observed afterwards; `u <row>` releases it.
async fn live_countdown<S: store::LinkSource>(history: &LinkHistory<S>, id: &str, updates: usize) {
    let mut ticks = history.ticks();
    for _ in 0..updates {
        if ticks.changed().await.is_err() {
            break;
        }
        if let Some(row) = history.rows().into_iter().find(|r| r.id == id) {
            println!("{} remaining: {}", row.short_url, row.countdown);
        }
    }
}

/// Map a 1-based overall row index from the command line to a record id.
fn row_id<S: store::LinkSource>(history: &LinkHistory<S>, arg: &str) -> Option<String> {
    let index: usize = arg.parse().ok()?;
    history
        .rows()
        .into_iter()
        .find(|r| r.index == index)
        .map(|r| r.id)
}

fn render<S: store::LinkSource>(history: &LinkHistory<S>) {
    match history.display_state() {
        DisplayState::Loading => println!("Loading your links..."),
        DisplayState::Error => {
            if let Some(e) = history.error() {
                println!("Could not load your links: {e}. Press r to reload.");
            }
        }
        DisplayState::Empty => {
            println!("No links yet. Create your first short link to see it here.")
        }
        DisplayState::Ready => {
            if history.reloading() {
                println!("(refreshing...)");
            }
            if let Some(banner) = history.inline_error() {
                println!("! {banner}");
            }
            println!(
                "{:>4}  {:<34} {:<14} {:<17} {:<17} {:<12}",
                "#", "short link", "alias", "created", "expires", "remaining"
            );
            for row in history.rows() {
                let link = if row.activatable {
                    row.short_url.clone()
                } else {
                    format!("{} (expired)", row.short_url)
                };
                println!(
                    "{:>4}  {:<34} {:<14} {:<17} {:<17} {:<12}",
                    row.index,
                    link,
                    row.alias.as_deref().unwrap_or("-"),
                    fmt_ts(row.created_at),
                    fmt_ts(row.expires_at),
                    row.countdown,
                );
            }
            println!(
                "Page {} of {}{}{}",
                history.page(),
                history.total_pages(),
                if history.can_prev() { "  [p]rev" } else { "" },
                if history.can_next() { "  [n]ext" } else { "" },
            );
        }
    }
}
