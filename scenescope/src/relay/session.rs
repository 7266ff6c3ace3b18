use std::collections::HashMap;

use crate::{Link, PortId, TabId};

/// Relay-side state of one tab.
#[derive(Debug)]
pub struct Session {
    tab_id: TabId,
    panel: Option<Link>,
    page: Option<Link>,
    page_ready: bool,
}

impl Session {
    fn new(tab_id: TabId) -> Self {
        Self {
            tab_id,
            panel: None,
            page: None,
            page_ready: false,
        }
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn panel(&self) -> Option<&Link> {
        self.panel.as_ref()
    }

    pub fn page(&self) -> Option<&Link> {
        self.page.as_ref()
    }

    pub fn is_page_ready(&self) -> bool {
        self.page_ready
    }

    /// Both sides have reported in: the readiness rule holds.
    pub fn is_ready(&self) -> bool {
        self.panel.is_some() && self.page_ready
    }

    fn is_vacant(&self) -> bool {
        self.panel.is_none() && self.page.is_none() && !self.page_ready
    }
}

/// Owned table of sessions keyed by tab.
///
/// Entries appear when either side of a tab reports in and disappear once
/// nothing is attached and the page is not ready, or on explicit removal.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<TabId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a panel link to a tab, returning the link it replaced.
    pub fn bind_panel(&mut self, tab_id: TabId, link: Link) -> Option<Link> {
        self.entry(tab_id).panel.replace(link)
    }

    /// Remove every panel binding held by `port`; returns the affected tabs.
    pub fn unbind_port(&mut self, port: &PortId) -> Vec<TabId> {
        let mut unbound = Vec::new();
        for session in self.sessions.values_mut() {
            if session.panel.as_ref().is_some_and(|l| l.port() == port) {
                session.panel = None;
                unbound.push(session.tab_id);
            }
        }
        self.prune();
        unbound
    }

    pub fn unbind_panel(&mut self, tab_id: TabId) -> Option<Link> {
        let link = self.sessions.get_mut(&tab_id)?.panel.take();
        self.prune();
        link
    }

    /// Attach a page link to a tab, returning the link it replaced.
    ///
    /// A new page starts unready; readiness of the page it replaces does not
    /// carry over.
    pub fn attach_page(&mut self, tab_id: TabId, link: Link) -> Option<Link> {
        let session = self.entry(tab_id);
        let previous = session.page.replace(link);
        if previous.is_some() {
            session.page_ready = false;
        }
        previous
    }

    /// The page attached through `port` went away; its readiness goes with
    /// it. A detach from any other port is stale and changes nothing.
    pub fn detach_page(&mut self, tab_id: TabId, port: &PortId) -> bool {
        let Some(session) = self.sessions.get_mut(&tab_id) else {
            return false;
        };
        if session.page.as_ref().is_none_or(|l| l.port() != port) {
            return false;
        }
        session.page = None;
        session.page_ready = false;
        self.prune();
        true
    }

    pub fn mark_page_ready(&mut self, tab_id: TabId) {
        self.entry(tab_id).page_ready = true;
    }

    pub fn remove(&mut self, tab_id: TabId) -> Option<Session> {
        self.sessions.remove(&tab_id)
    }

    pub fn get(&self, tab_id: TabId) -> Option<&Session> {
        self.sessions.get(&tab_id)
    }

    pub fn panel(&self, tab_id: TabId) -> Option<&Link> {
        self.get(tab_id).and_then(Session::panel)
    }

    pub fn page(&self, tab_id: TabId) -> Option<&Link> {
        self.get(tab_id).and_then(Session::page)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn entry(&mut self, tab_id: TabId) -> &mut Session {
        self.sessions
            .entry(tab_id)
            .or_insert_with(|| Session::new(tab_id))
    }

    fn prune(&mut self) {
        self.sessions.retain(|_, session| !session.is_vacant());
    }
}
