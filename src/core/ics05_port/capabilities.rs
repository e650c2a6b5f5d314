//! Capabilities: unforgeable handles proving that a module owns a port or a channel.
//!
//! A [`Capability`] can only be minted by a [`CapabilityStore`]; holding one and having the
//! store confirm it is registered under a given name is the only way to act on that name.

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use core::{fmt, str::FromStr};

use crate::core::ics05_port::error::Error;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::core::ics24_host::path::{ChannelCapabilityPath, PortsPath};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Capability {
    index: u64,
}

impl Capability {
    fn new(index: u64) -> Self {
        Self { index }
    }

    pub fn index(&self) -> u64 {
        self.index
    }
}

/// Capability handed to the module that bound a port.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PortCapability(Capability);

impl PortCapability {
    pub fn index(&self) -> u64 {
        self.0.index()
    }
}

impl From<Capability> for PortCapability {
    fn from(cap: Capability) -> Self {
        Self(cap)
    }
}

impl AsRef<Capability> for PortCapability {
    fn as_ref(&self) -> &Capability {
        &self.0
    }
}

/// Capability handed to the module owning a channel, minted once when the channel identifier is
/// allocated (`ChanOpenInit`, or `ChanOpenTry` without a previous channel).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChannelCapability(Capability);

impl ChannelCapability {
    pub fn index(&self) -> u64 {
        self.0.index()
    }
}

impl From<Capability> for ChannelCapability {
    fn from(cap: Capability) -> Self {
        Self(cap)
    }
}

impl AsRef<Capability> for ChannelCapability {
    fn as_ref(&self) -> &Capability {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CapabilityName(String);

impl CapabilityName {
    pub fn new(s: Cow<'_, str>) -> Result<Self, Error> {
        if !s.trim().is_empty() {
            Ok(Self(s.into_owned()))
        } else {
            Err(Error::invalid_capability_name())
        }
    }

    /// Name of the capability owning a port, `ports/<port_id>`.
    pub fn port(port_id: &PortId) -> Self {
        Self(PortsPath(port_id.clone()).to_string())
    }

    /// Name of the capability owning a channel, `capabilities/ports/<port_id>/channels/<channel_id>`.
    pub fn channel(port_id: &PortId, channel_id: &ChannelId) -> Self {
        Self(ChannelCapabilityPath(port_id.clone(), *channel_id).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CapabilityName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(Cow::Borrowed(s))
    }
}

/// In-memory registry of named capabilities. Indices are never reused, so a released
/// capability can not be confused with one minted later.
#[derive(Clone, Debug, Default)]
pub struct CapabilityStore {
    next_index: u64,
    owned: BTreeMap<CapabilityName, Capability>,
}

impl CapabilityStore {
    pub fn new_capability(&mut self, name: CapabilityName) -> Result<Capability, Error> {
        if self.owned.contains_key(&name) {
            return Err(Error::capability_taken(name.to_string()));
        }

        let capability = Capability::new(self.next_index);
        self.next_index += 1;
        self.owned.insert(name, capability.clone());

        Ok(capability)
    }

    pub fn get_capability(&self, name: &CapabilityName) -> Result<Capability, Error> {
        self.owned
            .get(name)
            .cloned()
            .ok_or_else(|| Error::capability_not_found(name.to_string()))
    }

    pub fn authenticate_capability(
        &self,
        name: &CapabilityName,
        capability: &Capability,
    ) -> Result<(), Error> {
        match self.owned.get(name) {
            Some(owned) if owned == capability => Ok(()),
            Some(_) => Err(Error::capability_not_owned(name.to_string())),
            None => Err(Error::capability_not_found(name.to_string())),
        }
    }

    pub fn claim_capability(
        &mut self,
        name: CapabilityName,
        capability: Capability,
    ) -> Result<(), Error> {
        match self.owned.get(&name) {
            Some(owned) if *owned == capability => Ok(()),
            Some(_) => Err(Error::capability_taken(name.to_string())),
            None => {
                self.owned.insert(name, capability);
                Ok(())
            }
        }
    }

    pub fn release_capability(
        &mut self,
        name: &CapabilityName,
        capability: &Capability,
    ) -> Result<(), Error> {
        self.authenticate_capability(name, capability)?;
        self.owned.remove(name);
        Ok(())
    }
}
