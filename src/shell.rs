use std::fmt;

use crate::models::ReviewContextKind;

/// Top-level views of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Review,
    Project,
    Interview,
}

/// Which collector gathers input for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorKind {
    CodeEditor,
    ProjectUploader,
}

/// Which presenter renders the response for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterKind {
    Review,
    Project,
    Interview,
}

/// One entry of the navigation bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
    pub active: bool,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Review, Route::Project, Route::Interview];

    /// Resolve a path; the root and unknown paths redirect to the general review
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/project" => Route::Project,
            "/interview" => Route::Interview,
            _ => Route::Review,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Review => "/review",
            Route::Project => "/project",
            Route::Interview => "/interview",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Review => "Code Review",
            Route::Project => "Project Review",
            Route::Interview => "Interview Readiness",
        }
    }

    pub fn collector(&self) -> CollectorKind {
        match self {
            Route::Review | Route::Interview => CollectorKind::CodeEditor,
            Route::Project => CollectorKind::ProjectUploader,
        }
    }

    pub fn presenter(&self) -> PresenterKind {
        match self {
            Route::Review => PresenterKind::Review,
            Route::Project => PresenterKind::Project,
            Route::Interview => PresenterKind::Interview,
        }
    }

    /// Backend context sent for submissions made from this route
    pub fn context(&self) -> ReviewContextKind {
        match self {
            Route::Review => ReviewContextKind::Review,
            Route::Project => ReviewContextKind::Deployment,
            Route::Interview => ReviewContextKind::Interview,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation entries with the active route flagged
pub fn nav_items(active: Route) -> Vec<NavItem> {
    Route::ALL
        .iter()
        .map(|&route| NavItem {
            route,
            label: route.label(),
            active: route == active,
        })
        .collect()
}

/// Navigation bar as a single Markdown line, active entry in bold
pub fn render_nav(active: Route) -> String {
    nav_items(active)
        .iter()
        .map(|item| {
            if item.active {
                format!("**{}**", item.label)
            } else {
                item.label.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
