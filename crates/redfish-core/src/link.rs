//! Wire shapes for links between resources.
//!
//! A link on the wire is either a bare URI string, an object carrying
//! `@odata.id`, `null`, or simply missing. All of the "absent" forms decode to
//! an empty [`Link`], which callers treat as "no relationship" rather than an
//! error.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A URI referencing another resource or collection. Empty means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link(String);

impl Link {
    /// Create a link from a URI.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// The referenced URI (empty when absent).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the link does not reference anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the URI, or `None` when the link is absent.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        if self.0.is_empty() {
            None
        } else {
            Some(&self.0)
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Link {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for Link {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

impl AsRef<str> for Link {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Uri(String),
            Reference {
                #[serde(rename = "@odata.id", default)]
                odata_id: Option<String>,
            },
        }

        Ok(match Option::<Wire>::deserialize(deserializer)? {
            Some(Wire::Uri(uri)) => Self(uri),
            Some(Wire::Reference { odata_id }) => Self(odata_id.unwrap_or_default()),
            None => Self::default(),
        })
    }
}

impl Serialize for Link {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Reference<'a> {
            #[serde(rename = "@odata.id")]
            odata_id: &'a str,
        }

        Reference { odata_id: &self.0 }.serialize(serializer)
    }
}

/// An ordered list of links, as found in `Members` or any array relationship.
///
/// `null` decodes to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Links(Vec<Link>);

impl Links {
    /// Create a list from links in declared order.
    #[must_use]
    pub fn new(links: Vec<Link>) -> Self {
        Self(links)
    }

    /// Number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the list has no links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in declared order.
    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.0.iter()
    }

    /// Append the links of another page, keeping order.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Consume into the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<Link> {
        self.0
    }
}

impl<'de> Deserialize<'de> for Links {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        null_as_default(deserializer).map(Self)
    }
}

impl<'a> IntoIterator for &'a Links {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Link> for Links {
    fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One page of a resource collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CollectionPage {
    /// Member links in server-declared order
    #[serde(rename = "Members", default)]
    pub members: Links,

    /// Total member count across all pages, as reported by the service
    #[serde(rename = "Members@odata.count", default)]
    pub count: Option<usize>,

    /// Link to the next page, if the collection is paginated
    #[serde(rename = "Members@odata.nextLink", default)]
    pub next_link: Link,
}

/// Deserialize `null` as the type's default value.
///
/// Many services send `null` for empty arrays and objects.
///
/// # Errors
///
/// Returns the underlying deserializer error for any non-null value of the wrong shape.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
