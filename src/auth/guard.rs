use crate::models::user::UserId;

/// Ownership check used before every mutating operation on projects and
/// tasks: the requester must be the recorded creator. Exact-match identifier
/// equality only.
pub fn is_creator(requester: UserId, creator: UserId) -> bool {
    requester == creator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_is_allowed() {
        assert!(is_creator(UserId(1), UserId(1)));
    }

    #[test]
    fn test_anyone_else_is_denied() {
        assert!(!is_creator(UserId(1), UserId(2)));
        assert!(!is_creator(UserId(2), UserId(1)));
    }
}
