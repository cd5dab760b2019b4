use url::{ParseError, Url};

/// How activating a link should be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// In-app route transition to path + query + fragment, no page reload.
    Route(String),
    /// Full top-level navigation in the same tab.
    Full(String),
}

/// The hosting application's navigation capability.
pub trait Navigator {
    /// In-app route transition.
    fn route(&mut self, path: &str);
    /// Full top-level navigation, replacing the current document.
    fn assign(&mut self, url: &str);
}

impl Dispatch {
    pub fn send_to<N: Navigator>(self, navigator: &mut N) {
        match self {
            Dispatch::Route(path) => navigator.route(&path),
            Dispatch::Full(url) => navigator.assign(&url),
        }
    }
}

/// Decide the dispatch mode for a candidate target. Total: parse failures
/// fall back to a full navigation with the raw string.
///
/// A relative reference is resolved against the current origin only when it
/// starts with `/`; other unparseable strings are opaque and take the
/// full-navigation fallback.
pub fn dispatch(target: &str, origin: &Url) -> Dispatch {
    match Url::parse(target) {
        Ok(parsed) => {
            if parsed.origin() == origin.origin() {
                Dispatch::Route(in_app_path(&parsed))
            } else {
                Dispatch::Full(parsed.to_string())
            }
        }
        Err(ParseError::RelativeUrlWithoutBase) if target.starts_with('/') => {
            match origin.join(target) {
                Ok(resolved) => Dispatch::Route(in_app_path(&resolved)),
                Err(_) => Dispatch::Full(target.to_string()),
            }
        }
        Err(_) => Dispatch::Full(target.to_string()),
    }
}

fn in_app_path(url: &Url) -> String {
    let mut out = url.path().to_string();
    if let Some(query) = url.query() {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
