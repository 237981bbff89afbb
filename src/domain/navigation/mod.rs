//! Navigation collaborator
//!
//! Routes of the dashboard. Navigation itself is presentation; the core only
//! asks for it after a successful key validation.

#[cfg(test)]
use mockall::automock;

/// Dashboard routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Dashboards,
    Playground,
    Protected,
    /// Easter egg behind the hidden door on the home page
    SecretRoom,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Dashboards => "/dashboards",
            Self::Playground => "/playground",
            Self::Protected => "/protected",
            Self::SecretRoom => "/secret-room",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Router used by flows that move the user to another page
#[cfg_attr(test, automock)]
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, route: Route);

    /// Return to the previous page
    fn back(&self);
}
