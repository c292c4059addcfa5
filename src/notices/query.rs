//! Filter, sort and paginate notices

use serde::Deserialize;

use super::Notice;

/// Default number of notices on a single page
pub const DEFAULT_LIMIT: usize = 20;

/// Maximum number of notices on a single page
pub const MAX_LIMIT: usize = 100;

/// Sort order of a notice list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    /// Newest first
    Latest,

    /// Oldest first
    Oldest,

    /// Pinned notices first, newest first within both groups
    #[default]
    PinnedFirst,
}

/// Parameters for listing notices
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    /// Case-insensitive search in title and content
    pub q: Option<String>,

    /// Only notices with this publish state
    pub is_published: Option<bool>,

    /// Sort order
    pub order: Order,

    /// Maximum number of notices in the page
    pub limit: usize,

    /// Number of notices to skip
    pub offset: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            q: None,
            is_published: None,
            order: Order::default(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Apply the query to all notices
///
/// Returns the requested page and the number of notices matching the filters, before
/// pagination. The sort is stable, notices with equal keys keep their storage order.
pub fn apply(notices: Vec<Notice>, query: &ListQuery) -> (Vec<Notice>, usize) {
    let needle = query
        .q
        .as_deref()
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut notices = notices
        .into_iter()
        .filter(|notice| {
            needle
                .as_deref()
                .is_none_or(|needle| notice.matches(needle))
        })
        .filter(|notice| {
            query
                .is_published
                .is_none_or(|is_published| notice.is_published == is_published)
        })
        .collect::<Vec<Notice>>();

    match query.order {
        Order::Latest => notices.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        Order::Oldest => notices.sort_by_key(|notice| notice.created_at),
        Order::PinnedFirst => notices.sort_by(|a, b| {
            b.is_pinned
                .cmp(&a.is_pinned)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
    }

    let total = notices.len();

    let page = notices
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect();

    (page, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notices::tests::notice;

    fn ids(notices: &[Notice]) -> Vec<i64> {
        notices.iter().map(|notice| notice.id).collect()
    }

    #[test]
    fn test_pinned_first() {
        let a = notice(1, "A", true, 1);
        let b = notice(2, "B", false, 2);
        let c = notice(3, "C", true, 3);

        let (page, total) = apply(vec![a, b, c], &ListQuery::default());
        assert_eq!(3, total);
        assert_eq!(vec![3, 1, 2], ids(&page));
    }

    #[test]
    fn test_pinned_first_keeps_storage_order_on_ties() {
        let notices = vec![
            notice(1, "A", false, 5),
            notice(2, "B", true, 5),
            notice(3, "C", false, 5),
            notice(4, "D", true, 5),
        ];

        let (page, _) = apply(notices, &ListQuery::default());
        assert_eq!(vec![2, 4, 1, 3], ids(&page));
    }

    #[test]
    fn test_latest_and_oldest() {
        let notices = vec![
            notice(1, "A", true, 10),
            notice(2, "B", false, 30),
            notice(3, "C", false, 20),
        ];

        let latest = ListQuery {
            order: Order::Latest,
            ..ListQuery::default()
        };
        let (page, _) = apply(notices.clone(), &latest);
        assert_eq!(vec![2, 3, 1], ids(&page));

        let oldest = ListQuery {
            order: Order::Oldest,
            ..ListQuery::default()
        };
        let (page, _) = apply(notices, &oldest);
        assert_eq!(vec![1, 3, 2], ids(&page));
    }

    #[test]
    fn test_search() {
        let food = notice(1, "Food", false, 1);
        let mut drinks = notice(2, "Drinks", false, 2);
        drinks.content = "Coffee and tea".to_string();
        let mut lunch = notice(3, "Lunch", false, 3);
        lunch.content = "Leftover FOOD in the kitchen".to_string();

        let query = ListQuery {
            q: Some("foo".to_string()),
            ..ListQuery::default()
        };

        let (page, total) = apply(vec![food, drinks, lunch], &query);
        assert_eq!(2, total);
        assert_eq!(vec![3, 1], ids(&page));
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let query = ListQuery {
            q: Some(String::new()),
            ..ListQuery::default()
        };

        let (_, total) = apply(vec![notice(1, "A", false, 1), notice(2, "B", false, 2)], &query);
        assert_eq!(2, total);
    }

    #[test]
    fn test_publish_filter() {
        let mut published = notice(1, "Published", false, 1);
        published.is_published = true;
        let draft = notice(2, "Draft", false, 2);

        let query = ListQuery {
            is_published: Some(true),
            ..ListQuery::default()
        };
        let (page, total) = apply(vec![published.clone(), draft.clone()], &query);
        assert_eq!(1, total);
        assert_eq!(vec![1], ids(&page));

        let query = ListQuery {
            is_published: Some(false),
            ..ListQuery::default()
        };
        let (page, total) = apply(vec![published, draft], &query);
        assert_eq!(1, total);
        assert_eq!(vec![2], ids(&page));
    }

    #[test]
    fn test_pagination() {
        let notices = (1..=5)
            .map(|id| notice(id, "Notice", false, id))
            .collect::<Vec<Notice>>();

        let query = |limit, offset| ListQuery {
            order: Order::Oldest,
            limit,
            offset,
            ..ListQuery::default()
        };

        let (page, total) = apply(notices.clone(), &query(2, 0));
        assert_eq!(5, total);
        assert_eq!(vec![1, 2], ids(&page));

        let (page, total) = apply(notices.clone(), &query(2, 4));
        assert_eq!(5, total);
        assert_eq!(vec![5], ids(&page));

        let (page, total) = apply(notices.clone(), &query(2, 5));
        assert_eq!(5, total);
        assert!(page.is_empty());

        let (page, total) = apply(notices, &query(100, 10));
        assert_eq!(5, total);
        assert!(page.is_empty());
    }
}
