/// One classified line of an extended M3U manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLine {
    /// `#EXT...` line. Arguments keep their order of appearance.
    Directive {
        name: String,
        arguments: Vec<(String, String)>,
    },
    /// URI, comment, or blank line.
    Plain,
}

impl ManifestLine {
    pub fn directive_name(&self) -> Option<&str> {
        match self {
            Self::Directive { name, .. } => Some(name),
            Self::Plain => None,
        }
    }

    /// First value for `key`, if this is a directive carrying it.
    pub fn argument(&self, key: &str) -> Option<&str> {
        match self {
            Self::Directive { arguments, .. } => arguments
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            Self::Plain => None,
        }
    }

    pub fn is_directive(&self, directive: &str) -> bool {
        self.directive_name() == Some(directive)
    }
}
