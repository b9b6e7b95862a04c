//! Entity families served by the backend, one fetch/upsert/delete triplet
//! each, all keyed by industry.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Events,
    Flags,
    Upgrades,
    Categories,
    Services,
    Roles,
    Presets,
    Conditions,
    MarketingCampaigns,
    LevelRewards,
}

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Events,
        EntityKind::Flags,
        EntityKind::Upgrades,
        EntityKind::Categories,
        EntityKind::Services,
        EntityKind::Roles,
        EntityKind::Presets,
        EntityKind::Conditions,
        EntityKind::MarketingCampaigns,
        EntityKind::LevelRewards,
    ];

    /// URL tab segment for this entity family.
    pub fn tab(&self) -> &'static str {
        match self {
            EntityKind::Events => "events",
            EntityKind::Flags => "flags",
            EntityKind::Upgrades => "upgrades",
            EntityKind::Categories => "categories",
            EntityKind::Services => "services",
            EntityKind::Roles => "roles",
            EntityKind::Presets => "presets",
            EntityKind::Conditions => "conditions",
            EntityKind::MarketingCampaigns => "marketing",
            EntityKind::LevelRewards => "level-rewards",
        }
    }

    /// Inverse of [`EntityKind::tab`].
    pub fn from_tab(tab: &str) -> Option<EntityKind> {
        EntityKind::ALL.into_iter().find(|k| k.tab() == tab)
    }
}
