//! Pure navigation logic: the sidebar menu and the session-driven page flow.
//!
//! Handlers derive redirect targets from [`AuthFlow`] instead of hardcoding
//! paths next to session side effects, which keeps the control flow testable
//! without rendering anything.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Landing,
    Dashboard,
    Books,
    Campaigns,
    Subscribers,
    Analytics,
    Settings,
    Profile,
}

impl Page {
    pub fn href(&self) -> &'static str {
        match self {
            Page::Landing => "/",
            Page::Dashboard => "/dashboard",
            Page::Books => "/books",
            Page::Campaigns => "/campaigns",
            Page::Subscribers => "/subscribers",
            Page::Analytics => "/analytics",
            Page::Settings => "/settings",
            Page::Profile => "/profile",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Landing => "IndieUnit",
            Page::Dashboard => "Dashboard",
            Page::Books => "Book Management",
            Page::Campaigns => "Email Campaigns",
            Page::Subscribers => "Subscribers",
            Page::Analytics => "Analytics",
            Page::Settings => "Settings",
            Page::Profile => "Profile",
        }
    }

    /// Pages tagged "Soon" exist in the menu but cannot be navigated to.
    pub fn is_available(&self) -> bool {
        !matches!(self, Page::Analytics | Page::Settings | Page::Profile)
    }
}

pub struct MenuEntry {
    pub label: &'static str,
    pub href: Option<&'static str>,
    pub active: bool,
    pub soon: bool,
}

/// The sidebar is a pure function of the current page and the auth state.
/// Anonymous visitors get no menu at all; disabled entries carry no link.
pub fn menu(current: Page, authenticated: bool) -> Vec<MenuEntry> {
    if !authenticated {
        return Vec::new();
    }

    [
        Page::Dashboard,
        Page::Books,
        Page::Campaigns,
        Page::Subscribers,
        Page::Analytics,
        Page::Settings,
        Page::Profile,
    ]
    .into_iter()
    .map(|page| MenuEntry {
        label: page.label(),
        href: page.is_available().then(|| page.href()),
        active: page == current,
        soon: !page.is_available(),
    })
    .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthFlow {
    /// No session lookup has completed yet.
    Loading,
    Anonymous,
    Authenticated(Page),
}

#[derive(Clone, Copy, Debug)]
pub enum AuthEvent {
    SessionEstablished,
    SessionCleared,
    NavigateTo(Page),
}

impl AuthFlow {
    /// A fresh session always lands on the dashboard; a cleared one always
    /// lands back on the landing page. Navigation to unavailable pages is a
    /// no-op, as is navigation without a session.
    pub fn apply(self, event: AuthEvent) -> AuthFlow {
        match (self, event) {
            (_, AuthEvent::SessionEstablished) => AuthFlow::Authenticated(Page::Dashboard),
            (_, AuthEvent::SessionCleared) => AuthFlow::Anonymous,
            (AuthFlow::Authenticated(_), AuthEvent::NavigateTo(page)) if page.is_available() => {
                AuthFlow::Authenticated(page)
            }
            (state, AuthEvent::NavigateTo(_)) => state,
        }
    }

    pub fn redirect_target(&self) -> &'static str {
        match self {
            AuthFlow::Loading | AuthFlow::Anonymous => Page::Landing.href(),
            AuthFlow::Authenticated(page) => page.href(),
        }
    }
}
