use super::EmployeeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Employee,
    Manager,
    Admin,
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    /// Unknown roles are treated as plain employees.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            "manager" => Role::Manager,
            _ => Role::Employee,
        })
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Employee => write!(f, "employee"),
            Role::Manager => write!(f, "manager"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// The signed-in employee. Read-only, supplied by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub employee_id: EmployeeId,
    pub name: String,
    pub department: String,
    pub role: Role,
    pub is_active: bool,
}

impl CurrentUser {
    /// Managers see the same admin screens as admins.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_roles_leniently() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("manager".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!("intern".parse::<Role>().unwrap(), Role::Employee);
    }

    #[test]
    fn managers_count_as_admins() {
        let user = CurrentUser {
            employee_id: EmployeeId::new("EMP007"),
            name: "Ada".to_string(),
            department: "R&D".to_string(),
            role: Role::Manager,
            is_active: true,
        };
        assert!(user.is_admin());
    }
}
