//! URL paths for the admin panel.
//!
//! List views live at `{industry}/{tab}` and detail views at
//! `{industry}/{tab}/{id}`. After a successful create the UI navigates from
//! the list shape to the detail shape using the newly assigned id.

use content_core::IndustryId;
use content_store::EntityKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    List {
        industry: IndustryId,
        kind: EntityKind,
    },
    Detail {
        industry: IndustryId,
        kind: EntityKind,
        id: String,
    },
}

impl Route {
    /// Parse a path like `coffee-shop/events/event-grand-opening`.
    /// Leading and trailing slashes are tolerated.
    pub fn parse(path: &str) -> Option<Route> {
        let segments: Vec<&str> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        match segments.as_slice() {
            [industry, tab] => Some(Route::List {
                industry: IndustryId((*industry).to_string()),
                kind: EntityKind::from_tab(tab)?,
            }),
            [industry, tab, id] => Some(Route::Detail {
                industry: IndustryId((*industry).to_string()),
                kind: EntityKind::from_tab(tab)?,
                id: (*id).to_string(),
            }),
            _ => None,
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::List { industry, kind } => format!("{}/{}", industry, kind.tab()),
            Route::Detail { industry, kind, id } => {
                format!("{}/{}/{}", industry, kind.tab(), id)
            }
        }
    }

    /// Move a list route to the detail route for `id`, e.g. after a create
    /// succeeds. Detail routes just retarget.
    pub fn into_detail(self, id: impl Into<String>) -> Route {
        match self {
            Route::List { industry, kind } | Route::Detail { industry, kind, .. } => {
                Route::Detail {
                    industry,
                    kind,
                    id: id.into(),
                }
            }
        }
    }
}
