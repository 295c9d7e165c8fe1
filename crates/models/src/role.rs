use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The role an account holds, which decides what it is allowed to do
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Teacher,
    #[default]
    Student,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::SuperAdmin, Self::Admin, Self::Teacher, Self::Student];

    /// Whether this role may create and edit catalog courses
    pub fn can_manage_courses(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin | Self::Teacher)
    }

    /// Whether this role may remove courses from the catalog
    pub fn can_delete_courses(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }

    /// Carts and schedules only exist for students
    pub fn is_student(self) -> bool {
        self == Self::Student
    }

    /// Whether a new account may pick this role for itself at registration
    pub fn is_self_assignable(self) -> bool {
        matches!(self, Self::Teacher | Self::Student)
    }
}

#[cfg(feature = "database")]
crate::value::impl_text_value!(Role);

#[cfg(test)]
mod test {
    use super::Role;
    use std::str::FromStr;

    #[test]
    fn test_course_management_permissions() {
        assert!(Role::SuperAdmin.can_manage_courses());
        assert!(Role::Admin.can_manage_courses());
        assert!(Role::Teacher.can_manage_courses());
        assert!(!Role::Student.can_manage_courses());
    }

    #[test]
    fn test_course_deletion_permissions() {
        assert!(Role::SuperAdmin.can_delete_courses());
        assert!(Role::Admin.can_delete_courses());
        assert!(!Role::Teacher.can_delete_courses());
        assert!(!Role::Student.can_delete_courses());
    }

    #[test]
    fn test_only_students_are_students() {
        let students: Vec<_> = Role::ALL.into_iter().filter(|r| r.is_student()).collect();
        assert_eq!(students, vec![Role::Student]);
    }

    #[test]
    fn test_admin_roles_are_not_self_assignable() {
        assert!(!Role::SuperAdmin.is_self_assignable());
        assert!(!Role::Admin.is_self_assignable());
        assert!(Role::Teacher.is_self_assignable());
        assert!(Role::Student.is_self_assignable());
    }

    #[test]
    fn test_role_names() {
        assert_eq!(Role::SuperAdmin.to_string(), "super-admin");
        assert_eq!(Role::from_str("teacher"), Ok(Role::Teacher));
        assert!(Role::from_str("super admin").is_err());
        assert!(Role::from_str("Student").is_err());

        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super-admin\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_default_role_is_student() {
        assert_eq!(Role::default(), Role::Student);
    }
}
