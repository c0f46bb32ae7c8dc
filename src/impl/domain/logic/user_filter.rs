use crate::entities::{CardRegistration, User, UserQuery};

pub(crate) fn matches(user: &User, query: &UserQuery) -> bool {
    let search_hit = match query.search.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(term) => {
            let needle = term.to_lowercase();
            user.email.to_lowercase().contains(&needle)
                || user
                    .display_name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
                || user
                    .employee_id
                    .as_deref()
                    .is_some_and(|id| id.contains(term))
        }
    };
    let card_hit = match query.card {
        CardRegistration::Any => true,
        CardRegistration::Registered => user.has_card(),
        CardRegistration::Unregistered => !user.has_card(),
    };
    search_hit
        && card_hit
        && query.role.is_none_or(|r| user.role == r)
        && query.status.is_none_or(|s| user.status == s)
}

pub(crate) fn apply(users: Vec<User>, query: &UserQuery) -> Vec<User> {
    users.into_iter().filter(|u| matches(u, query)).collect()
}
