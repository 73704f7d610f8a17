use crate::error::{LeapError, Result};
use crate::protocol::Request;
use crate::session::Session;
use crate::types::{AreaSummary, Href, HrefRef};
use crate::zone::Zone;
use std::collections::HashSet;
use std::fmt;

/// A child of an [`Area`]: a nested area or a controllable zone.
///
/// A given area's children are never mixed: a non-leaf area holds only
/// areas, a leaf area holds only zones.
#[derive(Debug)]
pub enum Child<'a> {
    Area(Area<'a>),
    Zone(Zone<'a>),
}

impl Child<'_> {
    /// Canonical href of the child node
    pub fn href(&self) -> &Href {
        match self {
            Child::Area(area) => area.href(),
            Child::Zone(zone) => zone.href(),
        }
    }

    /// Human-readable name of the child node
    pub fn name(&self) -> &str {
        match self {
            Child::Area(area) => area.name(),
            Child::Zone(zone) => zone.name(),
        }
    }
}

/// A physical area in the device tree.
///
/// Construction performs the full recursive discovery of the subtree;
/// the node is immutable afterwards. Re-discovery means building a fresh
/// tree from [`Session::root`].
pub struct Area<'a> {
    session: &'a Session,
    href: Href,
    name: String,
    children: Vec<Child<'a>>,
    leaf: bool,
}

impl fmt::Debug for Area<'_> {
    // The session back-reference has nothing useful to print.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Area")
            .field("href", &self.href)
            .field("name", &self.name)
            .field("leaf", &self.leaf)
            .field("children", &self.children)
            .finish()
    }
}

impl<'a> Area<'a> {
    pub(crate) fn discover(session: &'a Session, href: Href) -> Result<Self> {
        let mut visited = HashSet::new();
        Self::discover_inner(session, href, &mut visited)
    }

    fn discover_inner(
        session: &'a Session,
        href: Href,
        visited: &mut HashSet<Href>,
    ) -> Result<Self> {
        let summary_response = session.exchange(&Request::read(href.clone()))?;
        let summary: AreaSummary = summary_response
            .body_as("Area")
            .ok_or_else(|| LeapError::Discovery(format!("no Area body in summary for {href}")))?;

        // The canonical href returned by the bridge replaces the seed href
        // (e.g. /area/3 over /area/rootarea); child hrefs must round-trip
        // as canonical identities.
        let href = summary.href.clone();

        if !visited.insert(href.clone()) {
            return Err(LeapError::Discovery(format!(
                "area {href} appears more than once in the tree"
            )));
        }

        let child_response = session.exchange(&Request::read(href.join("childarea/summary")))?;

        let mut children = Vec::new();
        let leaf = match child_response.body_as::<Vec<HrefRef>>("AreaSummaries") {
            Some(child_areas) => {
                for child in child_areas {
                    children.push(Child::Area(Self::discover_inner(
                        session, child.href, visited,
                    )?));
                }
                false
            }
            None => {
                // No sub-areas, so this is a leaf; its children are the
                // zones the summary associates with it, if any.
                for entry in summary.associated_zones {
                    children.push(Child::Zone(Zone::discover(session, entry.href)?));
                }
                true
            }
        };

        Ok(Self {
            session,
            href,
            name: summary.name,
            children,
            leaf,
        })
    }

    /// Canonical href of this area
    pub fn href(&self) -> &Href {
        &self.href
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this area has no sub-areas
    pub fn leaf(&self) -> bool {
        self.leaf
    }

    /// Children in the order the bridge reported them
    pub fn children(&self) -> &[Child<'a>] {
        &self.children
    }

    /// The session this node issues requests through
    pub fn session(&self) -> &'a Session {
        self.session
    }

    /// Zones directly under this area (empty unless this is a leaf)
    pub fn zones(&self) -> impl Iterator<Item = &Zone<'a>> {
        self.children.iter().filter_map(|child| match child {
            Child::Zone(zone) => Some(zone),
            Child::Area(_) => None,
        })
    }
}
