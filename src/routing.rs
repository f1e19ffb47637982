// src/routing.rs
// Post-login redirection by user role
use crate::domain::errors::{RoutingError, RoutingResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoutingError;

    fn from_str(s: &str) -> RoutingResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(RoutingError::UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    AdminDashboard,
    Profile,
    Login,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::AdminDashboard => "/admin",
            Route::Profile => "/profile",
            Route::Login => "/login",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Where to send a visitor once the auth provider has resolved their identity
pub fn redirect_for(role: Option<Role>) -> Route {
    match role {
        Some(Role::Admin) => Route::AdminDashboard,
        Some(Role::User) => Route::Profile,
        None => Route::Login,
    }
}
