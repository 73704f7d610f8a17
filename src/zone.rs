use crate::error::{LeapError, Result};
use crate::protocol::{Request, Response};
use crate::session::Session;
use crate::types::{ControlType, Href, ZoneStatus, ZoneSummary};
use serde_json::json;
use std::fmt;

/// Identity shared by every zone variant: canonical href, name, and the
/// bridge-reported control type. Zones have no children and cache no
/// state; every read or write is a live exchange.
pub struct ZoneBase<'a> {
    session: &'a Session,
    href: Href,
    name: String,
    control_type: ControlType,
}

impl fmt::Debug for ZoneBase<'_> {
    // The session back-reference has nothing useful to print.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneBase")
            .field("href", &self.href)
            .field("name", &self.name)
            .field("control_type", &self.control_type)
            .finish()
    }
}

impl<'a> ZoneBase<'a> {
    /// Fetch a zone's identity from the bridge.
    pub fn new(session: &'a Session, href: impl Into<Href>) -> Result<Self> {
        let href = href.into();
        let response = session.exchange(&Request::read(href.clone()))?;
        let summary: ZoneSummary = response
            .body_as("Zone")
            .ok_or_else(|| LeapError::Discovery(format!("no Zone body in summary for {href}")))?;

        // Canonical href from the bridge replaces the seed href.
        Ok(Self {
            session,
            href: summary.href,
            name: summary.name,
            control_type: summary.control_type,
        })
    }

    /// Canonical href of this zone
    pub fn href(&self) -> &Href {
        &self.href
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Control type reported by the bridge
    pub fn control_type(&self) -> &ControlType {
        &self.control_type
    }

    /// Warn (once, at construction) when the bridge reports a different
    /// control type than the variant the caller asked for. The caller
    /// explicitly chose the variant, so this is recoverable.
    fn checked(self, wanted: ControlType) -> Self {
        if self.control_type != wanted {
            tracing::warn!(
                zone = %self.href,
                reported = %self.control_type,
                requested = %wanted,
                "zone control type mismatch"
            );
        }
        self
    }

    fn read_status(&self) -> Result<Response> {
        self.session.exchange(&Request::read(self.href.join("status")))
    }

    fn run_command(&self, command: serde_json::Value) -> Result<Response> {
        self.session
            .exchange(&Request::create(self.href.join("commandprocessor"), command))
    }
}

/// An on/off load
#[derive(Debug)]
pub struct SwitchedZone<'a> {
    base: ZoneBase<'a>,
}

impl<'a> SwitchedZone<'a> {
    /// Fetch the zone at `href` as a switched load.
    ///
    /// A zone whose reported control type is not `Switched` still
    /// constructs; the mismatch is logged as a warning.
    pub fn new(session: &'a Session, href: impl Into<Href>) -> Result<Self> {
        Ok(Self {
            base: ZoneBase::new(session, href)?.checked(ControlType::Switched),
        })
    }

    /// Canonical href of this zone
    pub fn href(&self) -> &Href {
        self.base.href()
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Control type reported by the bridge
    pub fn control_type(&self) -> &ControlType {
        self.base.control_type()
    }

    /// Read the live on/off state. `SwitchedLevel` "On" is true, any
    /// other value is false.
    pub fn state(&self) -> Result<bool> {
        let response = self.base.read_status()?;
        let status: ZoneStatus = response.body_as("ZoneStatus").ok_or_else(|| {
            LeapError::Protocol(format!("no ZoneStatus body for {}", self.base.href))
        })?;
        Ok(status.switched_level.as_deref() == Some("On"))
    }

    /// Command the load on or off.
    ///
    /// Returns the bridge's acknowledgement; it does not wait for the
    /// physical load to change.
    pub fn set_state(&self, on: bool) -> Result<Response> {
        self.base.run_command(json!({
            "CommandType": "GoToSwitchedLevel",
            "SwitchedLevelParameters": {
                "SwitchedLevel": if on { "On" } else { "Off" },
                "DelayTime": "00:00:01",
            }
        }))
    }
}

/// A dimmable load. Level control is not implemented; identity and type
/// handling only.
#[derive(Debug)]
pub struct DimmedZone<'a> {
    base: ZoneBase<'a>,
}

impl<'a> DimmedZone<'a> {
    /// Fetch the zone at `href` as a dimmed load; a mismatched control
    /// type is logged, not fatal.
    pub fn new(session: &'a Session, href: impl Into<Href>) -> Result<Self> {
        Ok(Self {
            base: ZoneBase::new(session, href)?.checked(ControlType::Dimmed),
        })
    }

    /// Canonical href of this zone
    pub fn href(&self) -> &Href {
        self.base.href()
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Control type reported by the bridge
    pub fn control_type(&self) -> &ControlType {
        self.base.control_type()
    }
}

/// A colour-tunable load. Colour control is not implemented; identity
/// and type handling only.
#[derive(Debug)]
pub struct SpectrumTuningZone<'a> {
    base: ZoneBase<'a>,
}

impl<'a> SpectrumTuningZone<'a> {
    /// Fetch the zone at `href` as a spectrum-tuning load; a mismatched
    /// control type is logged, not fatal.
    pub fn new(session: &'a Session, href: impl Into<Href>) -> Result<Self> {
        Ok(Self {
            base: ZoneBase::new(session, href)?.checked(ControlType::SpectrumTuning),
        })
    }

    /// Canonical href of this zone
    pub fn href(&self) -> &Href {
        self.base.href()
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Control type reported by the bridge
    pub fn control_type(&self) -> &ControlType {
        self.base.control_type()
    }
}

/// A controllable load, dispatched to the variant matching the control
/// type the bridge reports for it.
#[derive(Debug)]
pub enum Zone<'a> {
    Switched(SwitchedZone<'a>),
    Dimmed(DimmedZone<'a>),
    SpectrumTuning(SpectrumTuningZone<'a>),
    /// A control type this library does not classify; identity only
    Unclassified(ZoneBase<'a>),
}

impl<'a> Zone<'a> {
    /// Fetch the zone's identity once and wrap the matching variant.
    pub fn discover(session: &'a Session, href: impl Into<Href>) -> Result<Self> {
        let base = ZoneBase::new(session, href)?;
        Ok(match base.control_type.clone() {
            ControlType::Switched => Zone::Switched(SwitchedZone { base }),
            ControlType::Dimmed => Zone::Dimmed(DimmedZone { base }),
            ControlType::SpectrumTuning => Zone::SpectrumTuning(SpectrumTuningZone { base }),
            ControlType::Other(_) => Zone::Unclassified(base),
        })
    }

    fn base(&self) -> &ZoneBase<'a> {
        match self {
            Zone::Switched(zone) => &zone.base,
            Zone::Dimmed(zone) => &zone.base,
            Zone::SpectrumTuning(zone) => &zone.base,
            Zone::Unclassified(base) => base,
        }
    }

    /// Canonical href of this zone
    pub fn href(&self) -> &Href {
        self.base().href()
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        self.base().name()
    }

    /// Control type reported by the bridge
    pub fn control_type(&self) -> &ControlType {
        self.base().control_type()
    }

    /// Borrow the switched variant, if that is what this zone is
    pub fn as_switched(&self) -> Option<&SwitchedZone<'a>> {
        match self {
            Zone::Switched(zone) => Some(zone),
            _ => None,
        }
    }
}
