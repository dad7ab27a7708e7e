use std::{error, fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Driver,
    Admin,
}

impl Role {
    /// Picks the role from the path of the page the assistant runs on.
    pub fn from_path(path: &str) -> Self {
        if path.contains("driver") {
            Role::Driver
        } else if path.contains("admin") {
            Role::Admin
        } else {
            Role::Customer
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Driver => "driver",
            Role::Admin => "admin",
        }
    }

    /// Spoken list of what can be said on a page of this role.
    pub fn help(&self) -> &'static str {
        match self {
            Role::Customer => {
                "You can say: Book ride from location to location, Show nearby vehicles, Cancel booking"
            }
            Role::Driver => {
                "You can say: Accept ride, Reject ride, Start trip, Complete trip, Go online, Go offline"
            }
            Role::Admin => {
                "You can say: Track vehicle number, Show analytics, Filter Bangalore, Filter Porto, Show all, Refresh"
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl error::Error for UnknownRole {}

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unknown role '{}'", self.0)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "driver" => Ok(Role::Driver),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_follows_page_path() {
        assert_eq!(Role::from_path("/driver"), Role::Driver);
        assert_eq!(Role::from_path("/admin/dashboard"), Role::Admin);
        assert_eq!(Role::from_path("/tracking"), Role::Customer);
        assert_eq!(Role::from_path(""), Role::Customer);
    }

    #[test]
    fn parses_role_names() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(
            "pilot".parse::<Role>(),
            Err(UnknownRole("pilot".to_owned()))
        );
    }
}
