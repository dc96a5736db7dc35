use crate::error::ParseError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where an ABI source lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    File(PathBuf),
    Remote(Url),
}

impl Location {
    /// A filesystem location, canonicalized when the file exists so that the
    /// same file reached through different relative paths compares equal.
    pub fn file(path: impl AsRef<Path>) -> Location {
        let path = path.as_ref();
        Location::File(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
    }

    /// File name without the `.abi` extension.
    pub fn stem(&self) -> Option<String> {
        let file_name = match self {
            Location::File(path) => path.file_name()?.to_str()?.to_string(),
            Location::Remote(url) => url.path_segments()?.last()?.to_string(),
        };
        let stem = file_name.strip_suffix(".abi").unwrap_or(&file_name);
        (!stem.is_empty()).then(|| stem.to_string())
    }

    fn sibling(&self, relative: &str) -> Result<Location, ParseError> {
        match self {
            Location::File(path) => {
                let dir = path.parent().unwrap_or_else(|| Path::new(""));
                Ok(Location::file(dir.join(relative)))
            }
            Location::Remote(url) => url
                .join(relative)
                .map(Location::Remote)
                .map_err(|source| ParseError::Url {
                    url: relative.to_string(),
                    source,
                }),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// One entry of an `:implements=` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceRef {
    /// `Name`, meaning `Name.abi` next to the including source.
    Bare(String),
    /// `(path/or/url)`.
    Located(String),
}

impl InterfaceRef {
    /// Resolves the reference as written in a source loaded from `origin`.
    /// Without an origin, relative paths are taken from the current directory.
    pub fn resolve(&self, origin: Option<&Location>) -> Result<Location, ParseError> {
        match self {
            InterfaceRef::Bare(name) => relative_to(origin, &format!("{}.abi", name)),
            InterfaceRef::Located(locator) => match Url::parse(locator) {
                Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                    Ok(Location::Remote(url))
                }
                // one-letter schemes are Windows drive letters
                Ok(url) if url.scheme().len() > 1 => Err(ParseError::UnsupportedScheme {
                    scheme: url.scheme().to_string(),
                }),
                _ if Path::new(locator).is_absolute() => Ok(Location::file(locator)),
                _ => relative_to(origin, locator),
            },
        }
    }
}

fn relative_to(origin: Option<&Location>, relative: &str) -> Result<Location, ParseError> {
    match origin {
        Some(location) => location.sibling(relative),
        None => Ok(Location::file(relative)),
    }
}

/// Fetches the text of an ABI source.
pub trait SourceLoader {
    fn load(&self, location: &Location) -> Result<String, ParseError>;
}

/// Reads files from disk and fetches `http`/`https` sources with a blocking agent.
pub struct DefaultLoader {
    agent: ureq::Agent,
}

impl DefaultLoader {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl Default for DefaultLoader {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}

impl SourceLoader for DefaultLoader {
    fn load(&self, location: &Location) -> Result<String, ParseError> {
        match location {
            Location::File(path) => {
                debug!(path = %path.display(), "reading interface");
                fs::read_to_string(path).map_err(|source| ParseError::Io {
                    path: path.clone(),
                    source,
                })
            }
            Location::Remote(url) => {
                debug!(%url, "fetching interface");
                let response = self
                    .agent
                    .get(url.as_str())
                    .call()
                    .map_err(|source| ParseError::Fetch {
                        url: url.to_string(),
                        source: Box::new(source),
                    })?;
                response.into_string().map_err(|source| ParseError::FetchBody {
                    url: url.to_string(),
                    source,
                })
            }
        }
    }
}
