//! Request target decoding and document-root sandboxing.
//!
//! Resolution runs in two stages. [`decode_target`] is pure string work:
//! strip the query, percent-decode, map `/` to the index document, and
//! refuse anything containing `..`. [`DocumentRoot::resolve`] then joins the
//! result onto the root, canonicalizes it, and checks the canonical path is
//! still inside the root.
//!
//! The `..` filter is redundant with the canonical check but is kept: it
//! rejects traversal attempts before any filesystem call is made.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use tokio::fs;

#[derive(Debug)]
pub enum ResolveError {
    /// Malformed `%XX` escape, or the decoded bytes are not UTF-8 or contain NUL
    BadDecoding,
    /// Decoded target contains `..`
    Traversal,
    /// Canonical path is not inside the document root
    OutsideRoot,
    /// Canonicalization failed for a reason other than a missing file
    Unresolvable(io::Error),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::BadDecoding => f.write_str("invalid percent-encoding in target"),
            ResolveError::Traversal => f.write_str("target contains '..'"),
            ResolveError::OutsideRoot => f.write_str("target resolves outside the document root"),
            ResolveError::Unresolvable(e) => write!(f, "target could not be canonicalized: {}", e),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Unresolvable(e) => Some(e),
            _ => None,
        }
    }
}

/// Turns a raw request target into a root-relative path string.
///
/// # Example
///
/// ```
/// # use docserve::files::resolver::decode_target;
/// assert_eq!(decode_target("/", "index.html").unwrap(), "index.html");
/// assert_eq!(decode_target("/my%20page.html?x=1", "index.html").unwrap(), "my page.html");
/// assert!(decode_target("/%2e%2e/secret.html", "index.html").is_err());
/// ```
pub fn decode_target(target: &str, index: &str) -> Result<String, ResolveError> {
    let path = match target.split_once('?') {
        Some((path, _query)) => path,
        None => target,
    };

    let decoded = percent_decode(path)?;

    let decoded = if decoded == "/" {
        index.to_string()
    } else {
        decoded
    };

    let relative = decoded.strip_prefix('/').unwrap_or(&decoded);

    if relative.contains("..") {
        return Err(ResolveError::Traversal);
    }

    Ok(relative.to_string())
}

/// Strict RFC 3986 percent-decoding. `+` is left alone.
fn percent_decode(s: &str) -> Result<String, ResolveError> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(ResolveError::BadDecoding);
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let decoded = percent_decode_str(s)
        .decode_utf8()
        .map_err(|_| ResolveError::BadDecoding)?;

    if decoded.contains('\0') {
        return Err(ResolveError::BadDecoding);
    }

    Ok(decoded.into_owned())
}

/// The canonical directory every served file must live under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRoot {
    path: PathBuf,
}

impl DocumentRoot {
    /// Canonicalizes `path` and checks it is a directory.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = std::fs::canonicalize(path.as_ref())?;

        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", path.display()),
            ));
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `candidate` (already canonical) lies inside the root.
    ///
    /// Compares whole path components, so a sibling `webroot2` never matches
    /// a root named `webroot`.
    pub fn contains(&self, candidate: &Path) -> bool {
        #[cfg(any(windows, target_os = "macos"))]
        {
            fold_case(candidate).starts_with(fold_case(&self.path))
        }

        #[cfg(not(any(windows, target_os = "macos")))]
        {
            candidate.starts_with(&self.path)
        }
    }

    /// Joins a decoded relative path onto the root and canonicalizes it.
    ///
    /// The file does not have to exist. Missing trailing components are
    /// appended to the canonical form of the deepest existing ancestor, so
    /// the caller can still tell "forbidden" from "not found".
    ///
    /// A trailing separator in `relative` is kept on the result, so
    /// `index.html/` still names a directory and never the file.
    pub async fn resolve(&self, relative: &str) -> Result<PathBuf, ResolveError> {
        let joined = self.path.join(relative);

        let mut canonical = canonicalize_lenient(&joined)
            .await
            .map_err(ResolveError::Unresolvable)?;

        if !self.contains(&canonical) {
            return Err(ResolveError::OutsideRoot);
        }

        if relative.chars().next_back().is_some_and(std::path::is_separator) {
            canonical.push("");
        }

        Ok(canonical)
    }
}

#[cfg(any(windows, target_os = "macos"))]
fn fold_case(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().to_lowercase())
}

fn is_missing(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

async fn canonicalize_lenient(path: &Path) -> io::Result<PathBuf> {
    let first_err = match fs::canonicalize(path).await {
        Ok(p) => return Ok(p),
        Err(e) if is_missing(&e) => e,
        Err(e) => return Err(e),
    };

    let mut missing = Vec::new();
    let mut current = path;

    loop {
        let (Some(name), Some(parent)) = (current.file_name(), current.parent()) else {
            return Err(first_err);
        };
        missing.push(name.to_os_string());
        current = parent;

        match fs::canonicalize(current).await {
            Ok(mut base) => {
                for name in missing.iter().rev() {
                    base.push(name);
                }
                return Ok(base);
            }
            Err(e) if is_missing(&e) => continue,
            Err(e) => return Err(e),
        }
    }
}
