//! Admin and moderator dashboard sections and the writes they allow.

use crate::endpoints::Endpoint;
use crate::error::ValidationError;
use crate::models::Role;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardScope {
    Admin,
    Moderation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardSection {
    Posts,
    Comments,
    Topics,
    Users,
}

impl DashboardSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardSection::Posts => "posts",
            DashboardSection::Comments => "comments",
            DashboardSection::Topics => "topics",
            DashboardSection::Users => "users",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DashboardSection::Posts => "Posts",
            DashboardSection::Comments => "Comments",
            DashboardSection::Topics => "Topics",
            DashboardSection::Users => "Users",
        }
    }
}

impl fmt::Display for DashboardSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DashboardSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "posts" => Ok(DashboardSection::Posts),
            "comments" => Ok(DashboardSection::Comments),
            "topics" => Ok(DashboardSection::Topics),
            "users" => Ok(DashboardSection::Users),
            other => Err(format!("unknown section: {}", other)),
        }
    }
}

impl DashboardScope {
    fn prefix(&self) -> &'static str {
        match self {
            DashboardScope::Admin => "/api/admin",
            DashboardScope::Moderation => "/api/moderation",
        }
    }

    pub fn sections(&self) -> &'static [DashboardSection] {
        match self {
            DashboardScope::Admin => &[
                DashboardSection::Posts,
                DashboardSection::Comments,
                DashboardSection::Topics,
                DashboardSection::Users,
            ],
            DashboardScope::Moderation => &[
                DashboardSection::Posts,
                DashboardSection::Comments,
                DashboardSection::Users,
            ],
        }
    }

    pub fn supports(&self, section: DashboardSection) -> bool {
        self.sections().contains(&section)
    }

    /// Paginated listing path of a section (query string not included).
    pub fn list_path(&self, section: DashboardSection) -> Result<String, ValidationError> {
        if !self.supports(section) {
            return Err(ValidationError::Unsupported(format!(
                "{} section is not available on the {} dashboard",
                section, self
            )));
        }
        Ok(format!("{}/{}", self.prefix(), section))
    }
}

impl fmt::Display for DashboardScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DashboardScope::Admin => "admin",
            DashboardScope::Moderation => "moderation",
        })
    }
}

/// A single write issued from a dashboard row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Delete,
    Ban,
    Unban,
    ChangeRole(Role),
}

impl Mutation {
    /// Resolves the request line, rejecting combinations the backend does not offer.
    pub fn endpoint(
        &self,
        scope: DashboardScope,
        section: DashboardSection,
        id: i64,
    ) -> Result<Endpoint, ValidationError> {
        let base = scope.list_path(section)?;
        let endpoint = match (scope, section, *self) {
            (DashboardScope::Admin, _, Mutation::Delete) => Endpoint::delete(format!("{}/{}", base, id)),
            (
                DashboardScope::Moderation,
                DashboardSection::Posts | DashboardSection::Comments,
                Mutation::Delete,
            ) => Endpoint::delete(format!("{}/{}", base, id)),
            (_, DashboardSection::Users, Mutation::Ban) => Endpoint::post(format!("{}/{}/ban", base, id)),
            (_, DashboardSection::Users, Mutation::Unban) => {
                Endpoint::post(format!("{}/{}/unban", base, id))
            }
            (DashboardScope::Admin, DashboardSection::Users, Mutation::ChangeRole(role)) => {
                Endpoint::post(format!("{}/{}/role?newRole={}", base, id, role))
            }
            _ => {
                return Err(ValidationError::Unsupported(format!(
                    "{} on {} from the {} dashboard",
                    self.label(),
                    section,
                    scope
                )))
            }
        };
        Ok(endpoint)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mutation::Delete => "delete",
            Mutation::Ban => "ban",
            Mutation::Unban => "unban",
            Mutation::ChangeRole(_) => "role change",
        }
    }

    pub fn success_message(&self, section: DashboardSection) -> String {
        match self {
            Mutation::Delete => {
                let noun = section.title().trim_end_matches('s');
                format!("{} deleted successfully", noun)
            }
            Mutation::Ban => "User banned successfully".to_string(),
            Mutation::Unban => "User unbanned successfully".to_string(),
            Mutation::ChangeRole(_) => "Role updated successfully".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::Method;
    use rstest::rstest;

    #[rstest]
    #[case(DashboardScope::Admin, DashboardSection::Topics, Mutation::Delete, Method::Delete, "/api/admin/topics/4")]
    #[case(DashboardScope::Admin, DashboardSection::Users, Mutation::Ban, Method::Post, "/api/admin/users/4/ban")]
    #[case(DashboardScope::Admin, DashboardSection::Users, Mutation::ChangeRole(Role::Moderator), Method::Post, "/api/admin/users/4/role?newRole=MODERATOR")]
    #[case(DashboardScope::Moderation, DashboardSection::Comments, Mutation::Delete, Method::Delete, "/api/moderation/comments/4")]
    #[case(DashboardScope::Moderation, DashboardSection::Users, Mutation::Unban, Method::Post, "/api/moderation/users/4/unban")]
    fn mutations_map_to_endpoints(
        #[case] scope: DashboardScope,
        #[case] section: DashboardSection,
        #[case] mutation: Mutation,
        #[case] method: Method,
        #[case] path: &str,
    ) {
        let endpoint = mutation.endpoint(scope, section, 4).unwrap();
        assert_eq!(endpoint.method, method);
        assert_eq!(endpoint.path, path);
    }

    #[rstest]
    #[case(DashboardScope::Moderation, DashboardSection::Users, Mutation::ChangeRole(Role::Admin))]
    #[case(DashboardScope::Moderation, DashboardSection::Users, Mutation::Delete)]
    #[case(DashboardScope::Moderation, DashboardSection::Topics, Mutation::Delete)]
    #[case(DashboardScope::Admin, DashboardSection::Posts, Mutation::Ban)]
    fn unsupported_mutations_are_rejected(
        #[case] scope: DashboardScope,
        #[case] section: DashboardSection,
        #[case] mutation: Mutation,
    ) {
        assert!(matches!(
            mutation.endpoint(scope, section, 1),
            Err(ValidationError::Unsupported(_))
        ));
    }

    #[test]
    fn moderation_has_no_topics_section() {
        assert!(DashboardScope::Moderation.list_path(DashboardSection::Topics).is_err());
        assert_eq!(
            DashboardScope::Admin.list_path(DashboardSection::Users).unwrap(),
            "/api/admin/users"
        );
        assert_eq!(
            Mutation::Delete.success_message(DashboardSection::Comments),
            "Comment deleted successfully"
        );
    }
}
