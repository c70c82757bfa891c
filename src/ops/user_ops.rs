use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::model::project::Project;
use crate::model::user::CollaboratorUser;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InviteError {
    #[error("name is required")]
    NameRequired,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("user not found: {0}")]
    NotFound(String),
}

/// A validated invitation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invite {
    pub name: String,
    pub email: String,
    pub project_ids: Vec<String>,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

pub fn validate_invite(name: &str, email: &str, project_ids: &[String]) -> Result<Invite, InviteError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InviteError::NameRequired);
    }
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(InviteError::InvalidEmail);
    }
    Ok(Invite {
        name: name.to_string(),
        email: email.to_string(),
        project_ids: dedup(project_ids),
    })
}

/// Prepend the invited user (newest first)
pub fn invite_user(
    users: &[CollaboratorUser],
    invite: Invite,
    id: String,
    invited_at: NaiveDateTime,
) -> Vec<CollaboratorUser> {
    let mut out = Vec::with_capacity(users.len() + 1);
    out.push(CollaboratorUser {
        id,
        name: invite.name,
        email: invite.email,
        project_ids: invite.project_ids,
        invited_at,
    });
    out.extend_from_slice(users);
    out
}

/// Add projects to a user's assignments without duplicating existing ones
pub fn assign_projects(
    users: &[CollaboratorUser],
    user_id: &str,
    project_ids: &[String],
) -> Result<Vec<CollaboratorUser>, InviteError> {
    update_user(users, user_id, |u| {
        for id in project_ids {
            if !u.project_ids.contains(id) {
                u.project_ids.push(id.clone());
            }
        }
    })
}

pub fn remove_from_project(
    users: &[CollaboratorUser],
    user_id: &str,
    project_id: &str,
) -> Result<Vec<CollaboratorUser>, InviteError> {
    update_user(users, user_id, |u| u.project_ids.retain(|p| p != project_id))
}

fn update_user(
    users: &[CollaboratorUser],
    user_id: &str,
    edit: impl FnOnce(&mut CollaboratorUser),
) -> Result<Vec<CollaboratorUser>, InviteError> {
    let idx = users
        .iter()
        .position(|u| u.id == user_id)
        .ok_or_else(|| InviteError::NotFound(user_id.to_string()))?;
    let mut out = users.to_vec();
    edit(&mut out[idx]);
    Ok(out)
}

/// Split projects into those the user is assigned to and the rest,
/// each in project list order
pub fn partition_projects<'a>(
    user: &CollaboratorUser,
    projects: &'a [Project],
) -> (Vec<&'a Project>, Vec<&'a Project>) {
    projects
        .iter()
        .partition(|p| user.project_ids.contains(&p.id))
}

pub fn find_user<'a>(users: &'a [CollaboratorUser], user_id: &str) -> Option<&'a CollaboratorUser> {
    users.iter().find(|u| u.id == user_id)
}

fn dedup(ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(id.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Seed;
    use pretty_assertions::assert_eq;

    fn seed() -> Seed {
        Seed::builtin().unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2026-02-20 10:00", "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_validate_invite() {
        assert_eq!(
            validate_invite(" ", "a@b.co", &[]),
            Err(InviteError::NameRequired)
        );
        assert_eq!(
            validate_invite("Ana", "not-an-email", &[]),
            Err(InviteError::InvalidEmail)
        );
        assert_eq!(
            validate_invite("Ana", "ana@atria", &[]),
            Err(InviteError::InvalidEmail)
        );
        assert_eq!(
            validate_invite("Ana", "a b@atria.com", &[]),
            Err(InviteError::InvalidEmail)
        );
        let invite = validate_invite(" Ana ", " ana@atria.com ", &["1".into(), "1".into()]).unwrap();
        assert_eq!(invite.name, "Ana");
        assert_eq!(invite.email, "ana@atria.com");
        assert_eq!(invite.project_ids, vec!["1".to_string()]);
    }

    #[test]
    fn test_invite_prepends() {
        let seed = seed();
        let invite = validate_invite("Ana", "ana@atria.com", &["3".into()]).unwrap();
        let users = invite_user(&seed.users, invite, "u99".into(), now());
        assert_eq!(users.len(), seed.users.len() + 1);
        assert_eq!(users[0].id, "u99");
        assert_eq!(users[0].project_ids, vec!["3".to_string()]);
    }

    #[test]
    fn test_assign_projects_union() {
        let seed = seed();
        let users = assign_projects(&seed.users, "u3", &["8".into(), "9".into()]).unwrap();
        let carlos = find_user(&users, "u3").unwrap();
        assert_eq!(carlos.project_ids, vec!["1", "8", "9"]);
        assert!(assign_projects(&seed.users, "zz", &[]).is_err());
    }

    #[test]
    fn test_remove_from_project() {
        let seed = seed();
        let users = remove_from_project(&seed.users, "u1", "4").unwrap();
        let antonio = find_user(&users, "u1").unwrap();
        assert_eq!(antonio.project_ids, vec!["1", "2", "6", "9"]);
    }

    #[test]
    fn test_partition_projects() {
        let seed = seed();
        let user = find_user(&seed.users, "u2").unwrap();
        let (assigned, unassigned) = partition_projects(user, &seed.projects);
        let ids: Vec<&str> = assigned.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "5", "7"]);
        assert_eq!(unassigned.len(), 7);
    }
}
