use crate::model::{
    AutocompleteResponse, Category, CategoryFailure, FailureReason, SearchResultItem,
};
use std::collections::HashMap;

/// The outcome of searching a single category.
pub type CategoryResult = Result<Vec<SearchResultItem>, FailureReason>;

/// Merge the results of all categories into a single response.
///
/// Categories are emitted in the given order, with at most `cap` items each. Items reported
/// for a category they don't belong to are dropped. Failed categories are reported as
/// unavailable, in the same order.
pub fn aggregate(
    results: impl IntoIterator<Item = (Category, CategoryResult)>,
    order: &[Category],
    cap: usize,
) -> AutocompleteResponse {
    let mut results = results.into_iter().collect::<HashMap<_, _>>();
    let mut response = AutocompleteResponse::default();

    for category in order {
        match results.remove(category) {
            Some(Ok(items)) => response.items.extend(
                items
                    .into_iter()
                    .filter(|item| item.category == *category)
                    .take(cap),
            ),
            Some(Err(reason)) => response.unavailable.push(CategoryFailure {
                category: *category,
                reason,
            }),
            None => {}
        }
    }

    response
}

#[cfg(test)]
mod test {
    use super::*;

    fn items(category: Category, n: usize) -> Vec<SearchResultItem> {
        (0..n)
            .map(|i| SearchResultItem::new(category, format!("{i}"), format!("arc {i}")))
            .collect()
    }

    #[test]
    fn caps_and_orders() {
        let response = aggregate(
            [
                (Category::Package, Ok(items(Category::Package, 7))),
                (Category::Vulnerability, Ok(items(Category::Vulnerability, 2))),
                (Category::Advisory, Ok(items(Category::Advisory, 6))),
                (Category::Sbom, Ok(vec![])),
            ],
            &Category::ALL,
            5,
        );

        assert_eq!(response.count(Category::Vulnerability), 2);
        assert_eq!(response.count(Category::Sbom), 0);
        assert_eq!(response.count(Category::Advisory), 5);
        assert_eq!(response.count(Category::Package), 5);
        assert!(response.unavailable.is_empty());

        let categories = response
            .items
            .iter()
            .map(|item| item.category)
            .collect::<Vec<_>>();
        let mut sorted = categories.clone();
        sorted.sort();
        assert_eq!(categories, sorted);
    }

    #[test]
    fn drops_foreign_items() {
        let mut mixed = items(Category::Advisory, 2);
        mixed.extend(items(Category::Package, 2));

        let response = aggregate([(Category::Advisory, Ok(mixed))], &Category::ALL, 5);

        assert_eq!(response.items.len(), 2);
        assert_eq!(response.count(Category::Advisory), 2);
    }

    #[test]
    fn reports_failures() {
        let response = aggregate(
            [
                (Category::Package, Err(FailureReason::Timeout)),
                (Category::Vulnerability, Ok(items(Category::Vulnerability, 1))),
                (Category::Sbom, Err(FailureReason::Unavailable)),
            ],
            &Category::ALL,
            5,
        );

        assert_eq!(response.items.len(), 1);
        assert_eq!(
            response.unavailable,
            [
                CategoryFailure {
                    category: Category::Sbom,
                    reason: FailureReason::Unavailable
                },
                CategoryFailure {
                    category: Category::Package,
                    reason: FailureReason::Timeout
                },
            ]
        );
    }

    #[test]
    fn custom_order() {
        let response = aggregate(
            [
                (Category::Package, Ok(items(Category::Package, 1))),
                (Category::Vulnerability, Ok(items(Category::Vulnerability, 1))),
            ],
            &[Category::Package, Category::Vulnerability],
            5,
        );

        assert_eq!(response.items[0].category, Category::Package);
        assert_eq!(response.items[1].category, Category::Vulnerability);
    }
}
