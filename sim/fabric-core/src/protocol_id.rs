use std::fmt::{self, Display};
use thiserror::Error as ThisError;

/// The numeric identity of a [`Protocol`](crate::Protocol), assigned by a
/// [`ProtocolRegistry`](crate::ProtocolRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolId(u32);

impl ProtocolId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Gets the underlying ID number.
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProtocolId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<ProtocolId> for u32 {
    fn from(id: ProtocolId) -> Self {
        id.0
    }
}

impl Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The layer of the stack a protocol lives in.
///
/// Link, network and transport protocols share a numeric space, so a bare
/// [`ProtocolId`] is never used as a routing key on its own. See
/// [`ProtocolKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Layer {
    Link,
    Network,
    Transport,
}

impl TryFrom<u8> for Layer {
    type Error = LayerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Layer::Link),
            1 => Ok(Layer::Network),
            2 => Ok(Layer::Transport),
            _ => Err(LayerError::FromByte(value)),
        }
    }
}

impl From<Layer> for u8 {
    fn from(layer: Layer) -> Self {
        layer as u8
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Link => "link",
            Layer::Network => "network",
            Layer::Transport => "transport",
        };
        f.write_str(name)
    }
}

#[derive(Debug, ThisError, Clone, Copy, PartialEq, Eq)]
pub enum LayerError {
    #[error("Unable to create a layer from the byte {0}")]
    FromByte(u8),
}

/// A protocol as seen by a dispatcher: the layer it lives in and its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolKey {
    pub layer: Layer,
    pub protocol: ProtocolId,
}

impl ProtocolKey {
    pub const fn new(layer: Layer, protocol: ProtocolId) -> Self {
        Self { layer, protocol }
    }

    pub const fn link(protocol: ProtocolId) -> Self {
        Self::new(Layer::Link, protocol)
    }

    pub const fn network(protocol: ProtocolId) -> Self {
        Self::new(Layer::Network, protocol)
    }

    pub const fn transport(protocol: ProtocolId) -> Self {
        Self::new(Layer::Transport, protocol)
    }
}

impl Display for ProtocolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.layer, self.protocol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_bytes() {
        for layer in [Layer::Link, Layer::Network, Layer::Transport] {
            assert_eq!(Layer::try_from(u8::from(layer)), Ok(layer));
        }
        assert_eq!(Layer::try_from(7), Err(LayerError::FromByte(7)));
    }

    #[test]
    fn keys_with_same_id_differ_by_layer() {
        let id = ProtocolId::new(3);
        assert_ne!(ProtocolKey::network(id), ProtocolKey::transport(id));
        assert_eq!(ProtocolKey::link(id).to_string(), "link:3");
    }
}
