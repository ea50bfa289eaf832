//! Navigation history and the base URL it is anchored at.

/// A navigation stack.
///
/// # Example
/// ```
/// use news_nexus::History;
///
/// let mut history = History::new("/");
/// history.push("/settings");
/// assert_eq!(history.current(), &"/settings");
/// history.back();
/// assert_eq!(history.current(), &"/");
/// ```
#[derive(Debug, Clone)]
pub struct History<R: Clone + PartialEq> {
    current: R,
    stack: Vec<R>,
}

impl<R: Clone + PartialEq> History<R> {
    pub fn new(initial: R) -> Self {
        Self { current: initial, stack: Vec::new() }
    }

    pub fn current(&self) -> &R {
        &self.current
    }

    /// Make `entry` current. Pushing the current entry again is a no-op.
    pub fn push(&mut self, entry: R) {
        if self.current != entry {
            let previous = std::mem::replace(&mut self.current, entry);
            self.stack.push(previous);
        }
    }

    /// The entry `back` would return to.
    pub fn peek_back(&self) -> Option<&R> {
        self.stack.last()
    }

    /// Return to the previous entry. Returns false at the bottom of the stack.
    pub fn back(&mut self) -> bool {
        match self.stack.pop() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Number of entries behind the current one.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

/// The path prefix the application is served under, e.g. `/news/`.
///
/// Always starts and ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl Default for BaseUrl {
    fn default() -> Self {
        Self("/".to_owned())
    }
}

impl BaseUrl {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self(format!("/{trimmed}/"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Application path for an incoming href. Hrefs outside the base are
    /// taken as application paths already.
    pub fn strip<'a>(&self, href: &'a str) -> &'a str {
        if self.0 == "/" {
            return href;
        }
        let bare = self.0.trim_end_matches('/');
        match href.strip_prefix(bare) {
            Some("") => "/",
            Some(rest) if rest.starts_with('/') => rest,
            _ => href,
        }
    }

    /// Href for an application path.
    pub fn join(&self, path: &str) -> String {
        let bare = self.0.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{bare}/{path}")
    }
}
