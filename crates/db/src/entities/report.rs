//! Report entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Report status.
///
/// `pending` is the only initial state. The other three are terminal:
/// no transition is defined out of them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ReportStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "reviewed")]
    Reviewed,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "dismissed")]
    Dismissed,
}

impl ReportStatus {
    /// Whether this status accepts no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether a transition from `self` to `next` is defined.
    ///
    /// The table is exactly one hop out of `pending`; re-entering
    /// `pending` and leaving a terminal state are both undefined.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(self, Self::Pending) && !matches!(next, Self::Pending)
    }
}

/// What kind of entity a report targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum ReportTargetType {
    #[sea_orm(string_value = "recipe")]
    Recipe,
    #[sea_orm(string_value = "ingredient")]
    Ingredient,
    #[sea_orm(string_value = "category")]
    Category,
    #[sea_orm(string_value = "user")]
    User,
}

/// Fixed set of reasons a report may cite.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum ReportReason {
    #[sea_orm(string_value = "inappropriate")]
    Inappropriate,
    #[sea_orm(string_value = "spam")]
    Spam,
    #[sea_orm(string_value = "misleading")]
    Misleading,
    #[sea_orm(string_value = "copyright")]
    Copyright,
    #[sea_orm(string_value = "harassment")]
    Harassment,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Report model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user who submitted the report.
    pub reporter_id: String,

    /// Kind of entity being reported.
    pub target_type: ReportTargetType,

    /// Identifier of the reported entity, interpreted per `target_type`.
    pub target_id: String,

    pub reason: ReportReason,

    /// Optional free-text elaboration by the reporter.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub status: ReportStatus,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id"
    )]
    Reporter,
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_is_only_initial_state() {
        assert_eq!(ReportStatus::default(), ReportStatus::Pending);
        assert!(!ReportStatus::Pending.is_terminal());
    }

    #[test]
    fn test_one_hop_transitions_from_pending() {
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Reviewed));
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Resolved));
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Dismissed));
        assert!(!ReportStatus::Pending.can_transition_to(ReportStatus::Pending));
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        for terminal in [
            ReportStatus::Reviewed,
            ReportStatus::Resolved,
            ReportStatus::Dismissed,
        ] {
            assert!(terminal.is_terminal());
            for next in [
                ReportStatus::Pending,
                ReportStatus::Reviewed,
                ReportStatus::Resolved,
                ReportStatus::Dismissed,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }
}
