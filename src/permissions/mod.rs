//! Permission resolution
//!
//! Effective capability over a cell is computed fresh per request from
//! explicit inputs: the actor, the sheet's membership context, and the
//! agent row grants. No ambient session state is consulted.
//!
//! Capability composes by intersection for agents: a cell is reachable only
//! when the column is user-visible AND the row number falls inside at least
//! one of the agent's grants. Rows and columns outside that intersection are
//! omitted from reads entirely, not merely flagged read-only.

use serde::{Deserialize, Serialize};

use crate::columns::ColumnType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Supervisor,
    Agent,
    Partner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Agent => "agent",
            Role::Partner => "partner",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "supervisor" => Some(Role::Supervisor),
            "agent" => Some(Role::Agent),
            "partner" => Some(Role::Partner),
            _ => None,
        }
    }

    /// Admin and Supervisor see unmasked phone values
    pub fn sees_full_phone(&self) -> bool {
        matches!(self, Role::Admin | Role::Supervisor)
    }
}

/// The acting user, passed explicitly through the mutation gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: i32, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Inclusive row-number range granting one agent scope within a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowGrant {
    pub agent_id: i32,
    pub start_row: i64,
    pub end_row: i64,
}

impl RowGrant {
    pub fn covers(&self, row_number: i64) -> bool {
        self.start_row <= row_number && row_number <= self.end_row
    }
}

/// Membership context of one sheet, resolved fresh per request.
#[derive(Debug, Clone, Default)]
pub struct SheetContext {
    pub supervisor_ids: Vec<i32>,
    pub project_agent_ids: Vec<i32>,
    pub workbook_agent_ids: Vec<i32>,
    pub sheet_agent_ids: Vec<i32>,
    pub grants: Vec<RowGrant>,
}

impl SheetContext {
    pub fn supervises(&self, user_id: i32) -> bool {
        self.supervisor_ids.contains(&user_id)
    }

    /// Agent membership is granted at sheet, workbook, or project level
    pub fn agent_is_member(&self, user_id: i32) -> bool {
        self.sheet_agent_ids.contains(&user_id)
            || self.workbook_agent_ids.contains(&user_id)
            || self.project_agent_ids.contains(&user_id)
    }

    /// Overlapping grants union; there is no deny range
    pub fn row_granted(&self, agent_id: i32, row_number: i64) -> bool {
        self.grants
            .iter()
            .any(|g| g.agent_id == agent_id && g.covers(row_number))
    }
}

/// The column attributes the resolver needs
#[derive(Debug, Clone, Copy)]
pub struct ColumnMeta {
    pub column_type: ColumnType,
    pub visible_to_user: bool,
    pub editable_by_user: bool,
}

/// Effective capability over one cell (or one column when no row is given)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capability {
    pub view: bool,
    pub edit: bool,
    pub dial: bool,
}

/// Whether the actor can reach the sheet at all. A `false` here must surface
/// as 404-shaped NotFound, never as 403.
pub fn can_view_sheet(actor: &Actor, ctx: &SheetContext) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Supervisor => ctx.supervises(actor.user_id),
        Role::Agent => ctx.agent_is_member(actor.user_id),
        Role::Partner => true,
    }
}

/// Schema mutation rights: columns, phone pools, row grants.
pub fn can_manage_schema(actor: &Actor, ctx: &SheetContext) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Supervisor => ctx.supervises(actor.user_id),
        _ => false,
    }
}

/// Whether a column is visible to the actor at all.
pub fn column_visible(actor: &Actor, ctx: &SheetContext, column: &ColumnMeta) -> bool {
    if !can_view_sheet(actor, ctx) {
        return false;
    }
    match actor.role {
        Role::Admin => true,
        Role::Supervisor => ctx.supervises(actor.user_id),
        Role::Agent | Role::Partner => column.visible_to_user,
    }
}

/// Whether a row is visible to the actor.
pub fn row_visible(actor: &Actor, ctx: &SheetContext, row_number: i64) -> bool {
    if !can_view_sheet(actor, ctx) {
        return false;
    }
    match actor.role {
        Role::Admin | Role::Supervisor | Role::Partner => true,
        Role::Agent => ctx.row_granted(actor.user_id, row_number),
    }
}

/// Compute the effective capability for `(actor, sheet, row?, column)`.
pub fn cell_capability(
    actor: &Actor,
    ctx: &SheetContext,
    column: &ColumnMeta,
    row_number: Option<i64>,
) -> Capability {
    let view = column_visible(actor, ctx, column)
        && row_number.map_or(true, |r| row_visible(actor, ctx, r));

    if !view {
        return Capability::default();
    }

    let edit = match actor.role {
        Role::Admin => true,
        Role::Supervisor => true,
        Role::Agent => {
            column.editable_by_user
                && column.column_type != ColumnType::Phone
                && row_number.map_or(false, |r| ctx.row_granted(actor.user_id, r))
        }
        Role::Partner => false,
    };

    Capability {
        view,
        edit,
        dial: column.column_type == ColumnType::Phone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SheetContext {
        SheetContext {
            supervisor_ids: vec![10],
            project_agent_ids: vec![20, 21],
            workbook_agent_ids: vec![20],
            sheet_agent_ids: vec![21],
            grants: vec![
                RowGrant {
                    agent_id: 20,
                    start_row: 1,
                    end_row: 5,
                },
                RowGrant {
                    agent_id: 20,
                    start_row: 8,
                    end_row: 8,
                },
            ],
        }
    }

    fn text_column() -> ColumnMeta {
        ColumnMeta {
            column_type: ColumnType::Text,
            visible_to_user: true,
            editable_by_user: true,
        }
    }

    #[test]
    fn test_admin_has_full_capability() {
        let actor = Actor::new(1, Role::Admin);
        let cap = cell_capability(&actor, &ctx(), &text_column(), Some(999));
        assert!(cap.view && cap.edit);
    }

    #[test]
    fn test_supervisor_scoped_to_own_project() {
        let supervising = Actor::new(10, Role::Supervisor);
        let cap = cell_capability(&supervising, &ctx(), &text_column(), Some(3));
        assert!(cap.view && cap.edit);

        let other = Actor::new(11, Role::Supervisor);
        let cap = cell_capability(&other, &ctx(), &text_column(), Some(3));
        assert_eq!(cap, Capability::default());
        assert!(!can_view_sheet(&other, &ctx()));
    }

    #[test]
    fn test_agent_edit_requires_grant_intersection() {
        let agent = Actor::new(20, Role::Agent);
        let c = ctx();

        // Inside the 1..=5 grant
        let cap = cell_capability(&agent, &c, &text_column(), Some(3));
        assert!(cap.view && cap.edit);

        // Gap between grants
        let cap = cell_capability(&agent, &c, &text_column(), Some(6));
        assert!(!cap.view && !cap.edit);

        // Single-row grant
        let cap = cell_capability(&agent, &c, &text_column(), Some(8));
        assert!(cap.view && cap.edit);
    }

    #[test]
    fn test_agent_never_edits_phone() {
        let agent = Actor::new(20, Role::Agent);
        let phone = ColumnMeta {
            column_type: ColumnType::Phone,
            visible_to_user: true,
            editable_by_user: true,
        };
        let cap = cell_capability(&agent, &ctx(), &phone, Some(2));
        assert!(cap.view);
        assert!(!cap.edit);
        assert!(cap.dial);
    }

    #[test]
    fn test_hidden_column_is_omitted_for_agent() {
        let agent = Actor::new(20, Role::Agent);
        let hidden = ColumnMeta {
            column_type: ColumnType::Text,
            visible_to_user: false,
            editable_by_user: true,
        };
        let cap = cell_capability(&agent, &ctx(), &hidden, Some(2));
        assert_eq!(cap, Capability::default());

        // Admin still sees it
        let admin = Actor::new(1, Role::Admin);
        assert!(cell_capability(&admin, &ctx(), &hidden, Some(2)).view);
    }

    #[test]
    fn test_partner_is_read_only() {
        let partner = Actor::new(30, Role::Partner);
        let cap = cell_capability(&partner, &ctx(), &text_column(), Some(100));
        assert!(cap.view);
        assert!(!cap.edit);
    }

    #[test]
    fn test_non_member_agent_sees_nothing() {
        let stranger = Actor::new(99, Role::Agent);
        assert!(!can_view_sheet(&stranger, &ctx()));
        let cap = cell_capability(&stranger, &ctx(), &text_column(), Some(1));
        assert_eq!(cap, Capability::default());
    }

    #[test]
    fn test_role_round_trip() {
        for r in ["admin", "supervisor", "agent", "partner"] {
            assert_eq!(Role::parse(r).unwrap().as_str(), r);
        }
        assert!(Role::parse("owner").is_none());
    }
}
