use core::fmt;

use serde::{Deserialize, Serialize};

/// What a transform is known to contain.
///
/// A tag is a promise about the matrix contents that lets the engine take
/// shortcuts: a tag without `Scaling` promises an orthonormal linear block,
/// a tag without `Translation` promises a zero translation column, and so on.
/// [`Structure::General`] promises nothing and always selects the dense
/// kernels. Every non-general tag is a combination of the rotation,
/// translation and scaling components; general absorbs any combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Structure {
    #[default]
    Identity,
    Rotation,
    Translation,
    Scaling,
    RotationTranslation,
    RotationScaling,
    TranslationScaling,
    RotationTranslationScaling,
    General,
}

impl Structure {
    pub const fn from_components(rotation: bool, translation: bool, scaling: bool) -> Self {
        match (rotation, translation, scaling) {
            (false, false, false) => Structure::Identity,
            (true, false, false) => Structure::Rotation,
            (false, true, false) => Structure::Translation,
            (false, false, true) => Structure::Scaling,
            (true, true, false) => Structure::RotationTranslation,
            (true, false, true) => Structure::RotationScaling,
            (false, true, true) => Structure::TranslationScaling,
            (true, true, true) => Structure::RotationTranslationScaling,
        }
    }

    /// `(rotation, translation, scaling)`, or `None` for a general matrix.
    pub const fn components(self) -> Option<(bool, bool, bool)> {
        match self {
            Structure::Identity => Some((false, false, false)),
            Structure::Rotation => Some((true, false, false)),
            Structure::Translation => Some((false, true, false)),
            Structure::Scaling => Some((false, false, true)),
            Structure::RotationTranslation => Some((true, true, false)),
            Structure::RotationScaling => Some((true, false, true)),
            Structure::TranslationScaling => Some((false, true, true)),
            Structure::RotationTranslationScaling => Some((true, true, true)),
            Structure::General => None,
        }
    }

    pub const fn is_general(self) -> bool {
        matches!(self, Structure::General)
    }

    pub const fn is_identity(self) -> bool {
        matches!(self, Structure::Identity)
    }

    pub const fn has_rotation(self) -> bool {
        matches!(self.components(), Some((true, _, _)))
    }

    pub const fn has_translation(self) -> bool {
        matches!(self.components(), Some((_, true, _)))
    }

    pub const fn has_scaling(self) -> bool {
        matches!(self.components(), Some((_, _, true)))
    }

    /// Whether the linear block may differ from the identity.
    pub const fn has_linear(self) -> bool {
        self.has_rotation() || self.has_scaling()
    }

    /// Tag of a product of transforms tagged `self` and `other`.
    pub const fn union(self, other: Structure) -> Structure {
        match (self.components(), other.components()) {
            (Some((r1, t1, s1)), Some((r2, t2, s2))) => {
                Structure::from_components(r1 || r2, t1 || t2, s1 || s2)
            }
            _ => Structure::General,
        }
    }

    pub const fn with_translation(self) -> Structure {
        self.union(Structure::Translation)
    }

    pub const fn with_scaling(self) -> Structure {
        self.union(Structure::Scaling)
    }

    pub const fn with_rotation(self) -> Structure {
        self.union(Structure::Rotation)
    }

    /// Drop the translation component; general stays general.
    pub const fn without_translation(self) -> Structure {
        match self.components() {
            Some((r, _, s)) => Structure::from_components(r, false, s),
            None => Structure::General,
        }
    }

    /// Tag of the inverse. Scaling inverts densely and loses its structure.
    pub const fn inverse(self) -> Structure {
        if self.is_general() || self.has_scaling() {
            Structure::General
        } else {
            self
        }
    }

    /// Compact bitmask: rotation 1, translation 2, scaling 4, general 8.
    pub const fn bits(self) -> u8 {
        match self.components() {
            Some((r, t, s)) => (r as u8) | ((t as u8) << 1) | ((s as u8) << 2),
            None => 8,
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = match self.components() {
            None => return write!(f, "GENERAL"),
            Some((false, false, false)) => return write!(f, "IDENTITY"),
            Some(parts) => parts,
        };
        let names = [(parts.0, "ROTATION"), (parts.1, "TRANSLATION"), (parts.2, "SCALING")];
        let mut first = true;
        for (present, name) in names {
            if present {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}
