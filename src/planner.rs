/// Location value that asks for remote-only listings.
pub const REMOTE_SENTINEL: &str = "Remote";

/// One request against the job source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// The configured search term, before any remote folding.
    pub term: String,
    /// The configured location this query was planned for.
    pub origin: String,
    /// Free text sent as `what`.
    pub what: String,
    /// Sent as `where`; `None` for remote queries.
    pub location: Option<String>,
}

impl SearchQuery {
    pub fn is_remote(&self) -> bool {
        is_remote(&self.origin)
    }
}

pub fn is_remote(location: &str) -> bool {
    location.trim().eq_ignore_ascii_case(REMOTE_SENTINEL)
}

/// Cross product of terms and locations, term-major.
///
/// The source has no usable remote filter, so for the remote sentinel the
/// intent is folded into the search text and no location is sent.
pub fn plan<T, L>(terms: &[T], locations: &[L]) -> Vec<SearchQuery>
where
    T: AsRef<str>,
    L: AsRef<str>,
{
    let terms: Vec<&str> = terms
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect();
    let locations: Vec<&str> = locations
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut queries = Vec::with_capacity(terms.len() * locations.len());
    for term in &terms {
        for loc in &locations {
            let query = if is_remote(loc) {
                SearchQuery {
                    term: term.to_string(),
                    origin: loc.to_string(),
                    what: format!("{} remote", term),
                    location: None,
                }
            } else {
                SearchQuery {
                    term: term.to_string(),
                    origin: loc.to_string(),
                    what: term.to_string(),
                    location: Some(loc.to_string()),
                }
            };
            queries.push(query);
        }
    }
    queries
}
