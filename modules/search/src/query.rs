use crate::model::SearchResultItem;

/////////////////////////////////////////////////////////////////////////
// Public interface
/////////////////////////////////////////////////////////////////////////

/// How well an item matches a query, best first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Relevance {
    /// The label equals the query
    Exact,
    /// The label starts with the query
    Prefix,
    /// A word of the label starts with the query
    WordPrefix,
    /// The label contains the query
    Substring,
    /// Only the description contains the query
    Description,
}

/// A normalized search text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Normalize the text, `None` if nothing is left to search for.
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.is_empty() {
            true => None,
            false => Some(Self(text.to_lowercase())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Evaluate the relevance of an item, `None` if it doesn't match at all.
    pub fn relevance(&self, label: &str, description: Option<&str>) -> Option<Relevance> {
        let label = label.to_lowercase();

        if label == self.0 {
            return Some(Relevance::Exact);
        }
        if label.starts_with(&self.0) {
            return Some(Relevance::Prefix);
        }
        if word_starts(&label).any(|start| label[start..].starts_with(&self.0)) {
            return Some(Relevance::WordPrefix);
        }
        if label.contains(&self.0) {
            return Some(Relevance::Substring);
        }

        description
            .filter(|description| description.to_lowercase().contains(&self.0))
            .map(|_| Relevance::Description)
    }

    /// Filter and order items by relevance. Items of equal relevance are ordered by id.
    pub fn rank<I>(&self, items: I) -> Vec<SearchResultItem>
    where
        I: IntoIterator<Item = SearchResultItem>,
    {
        let mut ranked = items
            .into_iter()
            .filter_map(|item| {
                self.relevance(&item.label, item.description.as_deref())
                    .map(|relevance| (relevance, item))
            })
            .collect::<Vec<_>>();

        ranked.sort_by(|(a, a_item), (b, b_item)| {
            a.cmp(b).then_with(|| a_item.id.cmp(&b_item.id))
        });
        ranked.into_iter().map(|(_, item)| item).collect()
    }
}

/////////////////////////////////////////////////////////////////////////
// Internal helpers
/////////////////////////////////////////////////////////////////////////

/// Byte offsets of all words, a word starting after a non-alphanumeric character.
fn word_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.char_indices()
        .zip(text.chars().skip(1))
        .filter(|((_, c), _)| !c.is_alphanumeric())
        .map(|((i, c), _)| i + c.len_utf8())
}
