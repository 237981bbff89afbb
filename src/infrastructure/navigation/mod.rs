//! Navigator implementations

use std::sync::Mutex;

use tracing::info;

use crate::domain::navigation::{Navigator, Route};

/// Navigator that keeps a history stack and logs transitions
#[derive(Debug)]
pub struct TracingNavigator {
    history: Mutex<Vec<Route>>,
}

impl TracingNavigator {
    pub fn new(start: Route) -> Self {
        Self {
            history: Mutex::new(vec![start]),
        }
    }

    pub fn current(&self) -> Route {
        self.history
            .lock()
            .map(|h| h.last().copied().unwrap_or_default())
            .unwrap_or_default()
    }
}

impl Default for TracingNavigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator for TracingNavigator {
    fn navigate_to(&self, route: Route) {
        if let Ok(mut history) = self.history.lock() {
            info!("Navigating to {}", route);
            history.push(route);
        }
    }

    fn back(&self) {
        if let Ok(mut history) = self.history.lock() {
            if history.len() > 1 {
                history.pop();
            }
            info!("Navigated back to {}", history.last().copied().unwrap_or_default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_room_and_back() {
        let navigator = TracingNavigator::new(Route::Dashboards);

        navigator.navigate_to(Route::SecretRoom);
        assert_eq!(navigator.current(), Route::SecretRoom);

        navigator.back();
        assert_eq!(navigator.current(), Route::Dashboards);
    }

    #[test]
    fn test_back_at_start_stays() {
        let navigator = TracingNavigator::default();

        navigator.back();

        assert_eq!(navigator.current(), Route::Home);
    }
}
