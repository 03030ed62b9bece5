use std::collections::HashMap;
use std::path::Path;

/// Allow-list of servable file extensions and their content types.
///
/// This is the only source of content types. File bytes are never sniffed,
/// and anything not on the list is refused outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionPolicy {
    allowed: HashMap<String, String>,
}

impl Default for ExtensionPolicy {
    fn default() -> Self {
        Self::new(default_extensions())
    }
}

impl ExtensionPolicy {
    /// Builds a policy from `extension -> content type` pairs.
    ///
    /// Keys are normalized: a leading dot is dropped and the rest lowercased,
    /// so `".HTML"` and `"html"` name the same entry.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let allowed = entries
            .into_iter()
            .map(|(ext, content_type)| (normalize(ext.as_ref()), content_type.into()))
            .collect();
        Self { allowed }
    }

    /// Returns the content type for `path`, or `None` when its extension is
    /// not allowed.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::files::policy::ExtensionPolicy;
    /// # use std::path::Path;
    /// let policy = ExtensionPolicy::default();
    /// assert_eq!(policy.classify(Path::new("a/b.CSS")), Some("text/css; charset=UTF-8"));
    /// assert_eq!(policy.classify(Path::new("notes.txt")), None);
    /// ```
    pub fn classify(&self, path: &Path) -> Option<&str> {
        let ext = extension_of(path)?;
        self.allowed.get(&ext).map(|ct| ct.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// The built-in allow-list.
pub fn default_extensions() -> HashMap<String, String> {
    [
        ("html", "text/html; charset=UTF-8"),
        ("css", "text/css; charset=UTF-8"),
        ("js", "application/javascript; charset=UTF-8"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Lowercased text after the last dot of the file name, without the dot.
///
/// A dotfile such as `.html` counts as having extension `html`. Returns
/// `None` when the name has no dot at all.
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

fn normalize(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}
