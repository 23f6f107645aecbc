use std::collections::{BTreeMap, HashSet};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use packageurl::PackageUrl;
use serde::de::{Error, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const SCHEME: &str = "pkg:";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PurlErr {
    #[error("empty pURL")]
    Empty,
    #[error("missing 'pkg:' scheme")]
    MissingScheme,
    #[error("missing type")]
    MissingType,
    #[error("missing name")]
    MissingName,
    #[error("missing version")]
    MissingVersion,
    #[error("invalid qualifier: '{0}'")]
    InvalidQualifier(String),
    #[error("invalid pURL syntax: {0}")]
    Syntax(String),
}

/// A parsed Package URL.
///
/// Qualifiers are kept sorted by key, which makes the rendered form canonical.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Purl {
    pub ty: String,
    pub namespace: Option<String>,
    pub name: String,
    pub version: Option<String>,
    pub qualifiers: BTreeMap<String, String>,
    pub subpath: Option<String>,
}

/// Validate a pURL which must carry a version.
///
/// This is what incoming requests are checked against. It never looks at anything but the
/// string itself.
pub fn validate(raw: &str) -> Result<Purl, PurlErr> {
    let purl = Purl::from_str(raw)?;
    match purl.version.as_deref() {
        Some(version) if !version.is_empty() => Ok(purl),
        _ => Err(PurlErr::MissingVersion),
    }
}

/// Structural checks which the `packageurl` parser is lenient about.
fn check_structure(raw: &str) -> Result<(), PurlErr> {
    if raw.is_empty() {
        return Err(PurlErr::Empty);
    }

    let rest = raw.strip_prefix(SCHEME).ok_or(PurlErr::MissingScheme)?;
    // "pkg://type/..." is tolerated by the pURL grammar
    let rest = rest.trim_start_matches('/');

    let remainder = match rest.split_once('/') {
        Some((ty, remainder)) if !ty.is_empty() => remainder,
        _ => return Err(PurlErr::MissingType),
    };

    let path = remainder.split(['?', '#']).next().unwrap_or_default();
    // the version starts at the last '@', any other '@' must be encoded
    let coordinate = path.rsplit_once('@').map_or(path, |(coordinate, _)| coordinate);
    if coordinate.is_empty() || coordinate.ends_with('/') {
        return Err(PurlErr::MissingName);
    }
    if let Some(at) = coordinate.find('@') {
        let part = match coordinate.rfind('/') {
            Some(slash) if at < slash => "namespace",
            _ => "name",
        };
        return Err(PurlErr::Syntax(format!("'@' in {part} must be percent-encoded")));
    }

    let head = raw.split_once('#').map_or(raw, |(head, _)| head);
    if let Some((_, qualifiers)) = head.split_once('?') {
        let mut keys = HashSet::new();
        for pair in qualifiers.split('&').filter(|pair| !pair.is_empty()) {
            match pair.split_once('=') {
                Some((key, _)) if !key.is_empty() && keys.insert(key.to_lowercase()) => {}
                _ => return Err(PurlErr::InvalidQualifier(pair.to_string())),
            }
        }
    }

    Ok(())
}

impl Purl {
    /// The package coordinate only: type, namespace and name.
    pub fn base(&self) -> Purl {
        Purl {
            ty: self.ty.clone(),
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            version: None,
            qualifiers: Default::default(),
            subpath: None,
        }
    }

    /// The coordinate plus version, dropping qualifiers and subpath.
    pub fn without_qualifiers(&self) -> Purl {
        Purl {
            version: self.version.clone(),
            ..self.base()
        }
    }

    /// Check if both refer to the same package coordinate, ignoring version and qualifiers.
    pub fn same_base(&self, other: &Purl) -> bool {
        self.ty == other.ty && self.namespace == other.namespace && self.name == other.name
    }
}

impl FromStr for Purl {
    type Err = PurlErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        check_structure(s)?;

        let purl = PackageUrl::from_str(s).map_err(|err| PurlErr::Syntax(err.to_string()))?;

        if purl.ty().is_empty() {
            return Err(PurlErr::MissingType);
        }
        if purl.name().is_empty() {
            return Err(PurlErr::MissingName);
        }

        Ok(purl.into())
    }
}

impl From<PackageUrl<'_>> for Purl {
    fn from(value: PackageUrl) -> Self {
        Self {
            ty: value.ty().to_string(),
            namespace: value.namespace().map(|inner| inner.to_string()),
            name: value.name().to_string(),
            version: value.version().map(|inner| inner.to_string()),
            qualifiers: value
                .qualifiers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            subpath: value.subpath().map(|inner| inner.to_string()),
        }
    }
}

/// Percent-encode the characters which would otherwise change the structure of a pURL.
fn encode(value: &str, reserved: &[char]) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '%' || reserved.contains(&c) {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                result.push_str(&format!("%{b:02X}"));
            }
        } else {
            result.push(c);
        }
    }
    result
}

impl Display for Purl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{SCHEME}{}/", self.ty)?;

        if let Some(namespace) = &self.namespace {
            for segment in namespace.split('/') {
                write!(f, "{}/", encode(segment, &['@', '?', '#']))?;
            }
        }

        write!(f, "{}", encode(&self.name, &['/', '@', '?', '#']))?;

        if let Some(version) = &self.version {
            write!(f, "@{}", encode(version, &['?', '#']))?;
        }

        for (n, (k, v)) in self.qualifiers.iter().enumerate() {
            let separator = if n == 0 { '?' } else { '&' };
            write!(f, "{separator}{k}={}", encode(v, &['&', '#']))?;
        }

        if let Some(subpath) = &self.subpath {
            write!(f, "#{subpath}")?;
        }

        Ok(())
    }
}

impl Debug for Purl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Serialize for Purl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Purl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(PurlVisitor)
    }
}

struct PurlVisitor;

impl Visitor<'_> for PurlVisitor {
    type Value = Purl;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("a pURL")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Purl::from_str(v).map_err(|err| E::custom(format!("invalid pURL '{v}': {err}")))
    }
}
