use super::{IndexError, SearchIndex};
use crate::{
    model::{Category, SearchResultItem},
    query::Query,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use trustify_common::model::{Paginated, PaginatedResults};
use trustify_entity::dataset::Dataset;

/// An index over a dataset held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryIndex {
    items: BTreeMap<Category, Vec<SearchResultItem>>,
}

impl InMemoryIndex {
    pub fn new(dataset: &Dataset) -> Self {
        let mut items: BTreeMap<Category, Vec<SearchResultItem>> = BTreeMap::new();

        items.insert(
            Category::Vulnerability,
            dataset
                .vulnerabilities
                .iter()
                .map(|v| {
                    SearchResultItem::new(Category::Vulnerability, &v.id, &v.id)
                        .with_description(v.title.clone())
                })
                .collect(),
        );
        items.insert(
            Category::Sbom,
            dataset
                .sboms
                .iter()
                .map(|s| SearchResultItem::new(Category::Sbom, &s.id, s.label()))
                .collect(),
        );
        items.insert(
            Category::Advisory,
            dataset
                .advisories
                .iter()
                .map(|a| {
                    SearchResultItem::new(Category::Advisory, &a.id, &a.identifier)
                        .with_description(a.title.clone())
                })
                .collect(),
        );
        items.insert(
            Category::Package,
            dataset
                .packages
                .iter()
                .map(|p| SearchResultItem::new(Category::Package, &p.id, p.purl.to_string()))
                .collect(),
        );

        for items in items.values_mut() {
            items.sort_by(|a, b| a.id.cmp(&b.id));
        }

        Self { items }
    }
}

#[async_trait]
impl SearchIndex for InMemoryIndex {
    async fn search(
        &self,
        category: Category,
        query: Option<&Query>,
        paginated: Paginated,
    ) -> Result<PaginatedResults<SearchResultItem>, IndexError> {
        let items = self.items.get(&category).into_iter().flatten().cloned();

        let matching = match query {
            Some(query) => query.rank(items),
            None => items.collect(),
        };

        Ok(PaginatedResults {
            total: matching.len() as u64,
            items: paginated.apply(matching),
        })
    }
}
