//! crates/article_simplifier_core/src/policy.rs
//!
//! Request-scoped caller context and the data-driven access-control policy.
//!
//! The policy is a role table mapping (role, model, action) to a grant,
//! evaluated uniformly at the service boundary instead of scattering ad-hoc
//! checks through handlers. Reads are additionally owner-scoped in the store
//! itself; writes pass the cross-owner guard.

use uuid::Uuid;

/// The role a caller holds for the duration of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    SignedIn,
    Unauthenticated,
}

/// Explicit request-scoped context carrying caller identity and role.
/// Passed into every pipeline call; there is no global session state.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl RequestContext {
    pub fn signed_in(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::SignedIn,
        }
    }
}

/// The models a grant can apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Document,
    EnhancedDocument,
    TextExplanation,
}

/// The actions a grant can permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    IssueUploadSlot,
}

/// Whether `role` may perform `action` against `model`.
///
/// Mirrors the declarative permission table: unauthenticated callers hold no
/// model grants at all (they may only sign up or in, which never reaches
/// here); signed-in callers may CRUD every model, scoped to records they own,
/// and may request upload slots.
pub fn allows(role: Role, _model: Model, action: Action) -> bool {
    match role {
        Role::Unauthenticated => false,
        Role::SignedIn => matches!(
            action,
            Action::Read
                | Action::Create
                | Action::Update
                | Action::Delete
                | Action::IssueUploadSlot
        ),
    }
}

/// The cross-owner guard: a caller may only create or modify records
/// attributed to themselves.
pub fn is_same_owner(ctx: &RequestContext, record_owner: Uuid) -> bool {
    ctx.user_id == record_owner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_holds_no_model_grants() {
        for model in [Model::Document, Model::EnhancedDocument, Model::TextExplanation] {
            for action in [
                Action::Read,
                Action::Create,
                Action::Update,
                Action::Delete,
                Action::IssueUploadSlot,
            ] {
                assert!(!allows(Role::Unauthenticated, model, action));
            }
        }
    }

    #[test]
    fn signed_in_may_crud_owned_models() {
        assert!(allows(Role::SignedIn, Model::Document, Action::Create));
        assert!(allows(Role::SignedIn, Model::EnhancedDocument, Action::Delete));
        assert!(allows(Role::SignedIn, Model::TextExplanation, Action::Read));
        assert!(allows(Role::SignedIn, Model::Document, Action::IssueUploadSlot));
    }

    #[test]
    fn cross_owner_guard_compares_caller_to_record_owner() {
        let owner = Uuid::new_v4();
        let ctx = RequestContext::signed_in(owner);
        assert!(is_same_owner(&ctx, owner));
        assert!(!is_same_owner(&ctx, Uuid::new_v4()));
    }
}
