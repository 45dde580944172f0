use crate::auth::session::Actor;
use crate::models::contrib::{Capability, Contribution};

use super::action::{OpenAction, QueueAction};

pub fn can_view(actor: &Actor, contrib: &Contribution) -> bool {
    actor
        .permissions
        .has(&contrib.contrib_type.acl_code(Capability::View))
}

pub fn can_validate(actor: &Actor, contrib: &Contribution) -> bool {
    actor
        .permissions
        .has(&contrib.contrib_type.acl_code(Capability::Validate))
}

/// Authors may not approve their own work unless self-validation is on or
/// they are a founder.
pub fn is_self_approval(actor: &Actor, contrib: &Contribution, allow_self_validation: bool) -> bool {
    !allow_self_validation && !actor.is_founder && contrib.authorship.any()
}

/// Whether `actor` may run `action` on an item of `contrib`. `None` stands for
/// viewing the item or for an action name that did not parse.
pub fn check_auth(
    actor: &Actor,
    contrib: &Contribution,
    action: Option<QueueAction>,
    allow_self_validation: bool,
) -> bool {
    if !can_view(actor, contrib) {
        return false;
    }

    match action {
        Some(QueueAction::Open(OpenAction::Approve)) => {
            if is_self_approval(actor, contrib, allow_self_validation) {
                return false;
            }
            can_validate(actor, contrib)
        }
        Some(QueueAction::Open(OpenAction::AllowAuthorRepack | OpenAction::Deny)) => {
            can_validate(actor, contrib)
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::Permissions;
    use crate::models::contrib::{Authorship, ContribStatus, ContribType};
    use crate::queue::action::AnyAction;

    fn contrib(authorship: Authorship) -> Contribution {
        Contribution {
            id: 1,
            contrib_type: ContribType::Mod,
            name: "Thing".into(),
            name_clean: "thing".into(),
            user_id: 2,
            status: ContribStatus::New,
            authorship,
        }
    }

    fn actor(perms: &str, founder: bool) -> Actor {
        Actor {
            user_id: Some(2),
            username: "val".into(),
            is_founder: founder,
            permissions: Permissions::from_csv(perms),
        }
    }

    const APPROVE: Option<QueueAction> = Some(QueueAction::Open(OpenAction::Approve));
    const VALIDATOR: &str = "queue.mod.view,queue.mod.validate";

    #[test]
    fn view_is_required_for_everything() {
        let a = actor("queue.mod.validate,queue.style.view", true);
        let c = contrib(Authorship::default());
        assert!(!check_auth(&a, &c, None, true));
        assert!(!check_auth(&a, &c, APPROVE, true));
        assert!(!check_auth(&a, &c, Some(QueueAction::Any(AnyAction::Rebuild)), true));
    }

    #[test]
    fn author_cannot_approve_own_contribution() {
        let a = actor(VALIDATOR, false);
        for authorship in [
            Authorship { is_author: true, ..Default::default() },
            Authorship { is_active_coauthor: true, ..Default::default() },
            Authorship { is_coauthor: true, ..Default::default() },
        ] {
            assert!(!check_auth(&a, &contrib(authorship), APPROVE, false));
        }
    }

    #[test]
    fn self_approval_allowed_when_any_condition_is_false() {
        let author = Authorship { is_author: true, ..Default::default() };
        // Self validation enabled.
        assert!(check_auth(&actor(VALIDATOR, false), &contrib(author), APPROVE, true));
        // Founder.
        assert!(check_auth(&actor(VALIDATOR, true), &contrib(author), APPROVE, false));
        // Not an author.
        assert!(check_auth(&actor(VALIDATOR, false), &contrib(Authorship::default()), APPROVE, false));
    }

    #[test]
    fn author_may_still_deny_and_allow_repack() {
        let a = actor(VALIDATOR, false);
        let c = contrib(Authorship { is_author: true, ..Default::default() });
        assert!(check_auth(&a, &c, Some(QueueAction::Open(OpenAction::Deny)), false));
        assert!(check_auth(&a, &c, Some(QueueAction::Open(OpenAction::AllowAuthorRepack)), false));
    }

    #[test]
    fn verdict_actions_need_validate() {
        let a = actor("queue.mod.view", false);
        let c = contrib(Authorship::default());
        for act in [OpenAction::Approve, OpenAction::Deny, OpenAction::AllowAuthorRepack] {
            assert!(!check_auth(&a, &c, Some(QueueAction::Open(act)), false));
        }
        for act in [OpenAction::InProgress, OpenAction::Tested, OpenAction::Move] {
            assert!(check_auth(&a, &c, Some(QueueAction::Open(act)), false));
        }
        assert!(check_auth(&a, &c, None, false));
    }
}
