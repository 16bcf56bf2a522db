//! Which templates a requester may see.
use crate::db::user_repo::User;
use crate::zone::{UserId, ZoneTemplate};

/// The capability a listing is performed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Admin,
    Owner(UserId),
}

impl From<&User> for Requester {
    fn from(user: &User) -> Self {
        if user.admin {
            Requester::Admin
        } else {
            Requester::Owner(user.id)
        }
    }
}

/// Administrators see everything; anyone else only the templates they own.
pub fn is_visible_to(template: &ZoneTemplate, requester: Requester) -> bool {
    match requester {
        Requester::Admin => true,
        Requester::Owner(id) => template.user == Some(id),
    }
}

pub fn templates_for_user(
    templates: impl IntoIterator<Item = ZoneTemplate>,
    requester: Requester,
) -> Vec<ZoneTemplate> {
    templates
        .into_iter()
        .filter(|t| is_visible_to(t, requester))
        .collect()
}

pub fn templates_with_soa(templates: impl IntoIterator<Item = ZoneTemplate>) -> Vec<ZoneTemplate> {
    templates.into_iter().filter(ZoneTemplate::has_soa).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::{RecordKind, RecordTemplate};

    fn templates() -> Vec<ZoneTemplate> {
        let soa = RecordTemplate::new(RecordKind::Soa, "%ZONE%", "ns1.%ZONE%");
        vec![
            ZoneTemplate::new("global", 60).with_record(soa.clone()),
            ZoneTemplate::new("alice", 60).owned_by(1),
            ZoneTemplate::new("bob", 60).owned_by(2).with_record(soa),
        ]
    }

    fn names(ts: &[ZoneTemplate]) -> Vec<&str> {
        ts.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn admin_sees_everything() {
        let visible = templates_for_user(templates(), Requester::Admin);
        assert_eq!(names(&visible), ["global", "alice", "bob"]);
    }

    #[test]
    fn owner_sees_only_own() {
        assert_eq!(names(&templates_for_user(templates(), Requester::Owner(1))), ["alice"]);
        assert!(templates_for_user(templates(), Requester::Owner(9)).is_empty());
    }

    #[test]
    fn soa_filter() {
        assert_eq!(names(&templates_with_soa(templates())), ["global", "bob"]);
    }

    #[test]
    fn requester_from_user() {
        let mut user = User {
            id: 4,
            login: "carol".into(),
            admin: false,
            created_at: chrono::Utc::now(),
        };
        assert_eq!(Requester::from(&user), Requester::Owner(4));
        user.admin = true;
        assert_eq!(Requester::from(&user), Requester::Admin);
    }
}
