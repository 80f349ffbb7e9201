use std::fmt;

use rgb::RGBA;

/// Identifier of one color pot within its palette.
///
/// Ids are opaque strings assigned by the host. They are unique within a
/// palette and stable for its lifetime, so they survive renames and
/// reorderings; all matching in this crate is by id, never by name or
/// position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PotId(String);

impl PotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PotId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for PotId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Payload class of a pot: a single flat color, or a gradient ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotKind {
    Solid,
    Gradient,
}

/// One pot of a palette: its stable id, its color data, and its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPot {
    pub id: PotId,
    pub rgba: RGBA<u8>,
    pub kind: PotKind,
}

impl ColorPot {
    pub fn new(id: PotId, rgba: RGBA<u8>, kind: PotKind) -> Self {
        Self { id, rgba, kind }
    }

    /// A fully opaque solid pot.
    pub fn solid(id: impl Into<PotId>, r: u8, g: u8, b: u8) -> Self {
        Self {
            id: id.into(),
            rgba: RGBA { r, g, b, a: 255 },
            kind: PotKind::Solid,
        }
    }

    /// A gradient pot. The `rgba` field holds the first stop, which is
    /// enough for identity here since gradients never merge.
    pub fn gradient(id: impl Into<PotId>, rgba: RGBA<u8>) -> Self {
        Self {
            id: id.into(),
            rgba,
            kind: PotKind::Gradient,
        }
    }

    /// Whether this pot can take part in a merge: solid and fully opaque.
    ///
    /// The similarity metric reads only R, G and B, so pots with any
    /// transparency are excluded up front rather than merged on a partial
    /// match. Gradients have no single color to compare at all.
    pub fn is_opaque_solid(&self) -> bool {
        self.kind == PotKind::Solid && self.rgba.a == 255
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_solid_is_eligible() {
        let pot = ColorPot::solid("p1", 10, 20, 30);
        assert!(pot.is_opaque_solid());
    }

    #[test]
    fn translucent_solid_is_not_eligible() {
        let pot = ColorPot::new(
            PotId::new("p1"),
            RGBA {
                r: 10,
                g: 20,
                b: 30,
                a: 254,
            },
            PotKind::Solid,
        );
        assert!(!pot.is_opaque_solid());
    }

    #[test]
    fn gradient_is_not_eligible_even_when_opaque() {
        let pot = ColorPot::gradient(
            "ramp",
            RGBA {
                r: 10,
                g: 20,
                b: 30,
                a: 255,
            },
        );
        assert!(!pot.is_opaque_solid());
    }

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(PotId::new("0x07"), PotId::from("0x07"));
        assert_ne!(PotId::new("0x07"), PotId::new("0x08"));
    }
}
