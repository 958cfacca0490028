//! Structure-aware affine transforms.
//!
//! Both affine-capable shapes ([`Mat3x4`] and [`Mat4`]) carry a [`Structure`]
//! tag. Constructors set the tightest tag they can prove; composition and
//! inversion use it to skip work (a rotation inverts by transposition, two
//! translations compose by addition) and fall back to the dense kernels for
//! anything tagged general or scaled.
//!
//! Writing storage directly never retags a transform. After such writes call
//! [`Affine::inspect_structure`] or [`Affine::mark_general`]; a stale tag
//! produces wrong results on the fast paths. Debug builds verify the tag of
//! every fast-path result.

use crate::numerics::error::MathError;
use crate::numerics::kernels;
use crate::numerics::types::matrix::{Mat3x4, Mat4};
use crate::numerics::types::traits::{Matrix, MatrixMut};
use crate::numerics::types::vector::{Vector3, Vector4};
use crate::scratch::{Pooled, Scratch};

pub mod decompose;
pub mod engine;
pub mod flags;
pub mod inspect;
pub mod special;

pub use flags::Structure;

/// A column-major matrix with a translation column and a structure tag.
pub trait Affine: MatrixMut + Pooled {
    /// The current tag.
    fn structure(&self) -> Structure;

    /// Replace the tag without touching the contents. The caller vouches for
    /// the tag; debug builds check it.
    fn assume_structure(&mut self, structure: Structure);

    /// `self = lhs * rhs` with the dense kernel of this shape; tagged general.
    fn dense_product<L, R>(&mut self, lhs: &L, rhs: &R)
    where
        L: Matrix + ?Sized,
        R: Matrix + ?Sized;

    /// General inverse with the dense kernel of this shape; tagged general.
    fn dense_invert_into(&self, dest: &mut Self) -> Result<(), MathError>;

    fn translation(&self) -> [f32; 3] {
        [self.get(0, 3), self.get(1, 3), self.get(2, 3)]
    }

    /// Copy contents and tag of another transform, reshaping as needed.
    fn set_transform<S: Affine>(&mut self, src: &S) {
        self.copy_from(src);
        self.assume_structure(src.structure());
    }

    /// `self = lhs * rhs`.
    fn compose<L: Affine, R: Affine>(&mut self, lhs: &L, rhs: &R) {
        engine::compose(self, lhs, rhs);
    }

    /// `self = self * rhs`.
    fn post_compose<R: Affine>(&mut self, rhs: &R, scratch: &Scratch) {
        let mut lhs = scratch.lease::<Self>();
        lhs.set_transform(self);
        engine::compose(self, &*lhs, rhs);
    }

    /// `self = lhs * self`.
    fn pre_compose<L: Affine>(&mut self, lhs: &L, scratch: &Scratch) {
        let mut rhs = scratch.lease::<Self>();
        rhs.set_transform(self);
        engine::compose(self, lhs, &*rhs);
    }

    /// Write the inverse into `dest`. `dest` is untouched on failure.
    fn invert_into(&self, dest: &mut Self) -> Result<(), MathError> {
        engine::invert_into(self, dest)
    }

    /// Invert in place; untouched on failure.
    fn invert(&mut self, scratch: &Scratch) -> Result<(), MathError> {
        let mut src = scratch.lease::<Self>();
        src.set_transform(self);
        engine::invert_into(&*src, self)
    }

    /// Write the normal matrix (inverse transpose of the linear block, no
    /// translation) into `dest`.
    fn normal_into(&self, dest: &mut Self) -> Result<(), MathError> {
        engine::normal_into(self, dest)
    }

    /// Replace `self` with its normal matrix; untouched on failure.
    fn normal(&mut self, scratch: &Scratch) -> Result<(), MathError> {
        let mut src = scratch.lease::<Self>();
        src.set_transform(self);
        engine::normal_into(&*src, self)
    }

    /// Retag from the contents and return the new tag.
    fn inspect_structure(&mut self) -> Structure {
        let structure = inspect::inspect(self);
        self.assume_structure(structure);
        structure
    }

    fn structure_is_sound(&self) -> bool {
        inspect::is_sound(self, self.structure())
    }

    /// Panic if the tag misdescribes the contents.
    #[track_caller]
    fn assert_structure_sound(&self) {
        if let Some(violation) = inspect::soundness_violation(self, self.structure()) {
            panic!("transform tagged {} but {violation}", self.structure());
        }
    }

    /// Forget everything known about the contents.
    fn mark_general(&mut self) {
        self.assume_structure(Structure::General);
    }

    /// Record that the translation column may now be nonzero.
    fn mark_translation(&mut self) {
        let structure = self.structure().with_translation();
        self.assume_structure(structure);
    }

    fn set_translation(&mut self, x: f32, y: f32, z: f32) {
        special::set_translation(self, x, y, z);
    }

    fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        special::set_scale(self, x, y, z);
    }

    /// Rotation of `angle` radians about the axis `(x, y, z)`. A zero axis
    /// gives the identity.
    fn set_axis_angle(&mut self, angle: f32, x: f32, y: f32, z: f32) {
        special::set_axis_angle(self, angle, x, y, z);
    }

    /// Rotation of the quaternion `<w, x, y, z>`, normalized first. A zero
    /// quaternion gives the identity.
    fn set_quaternion(&mut self, w: f32, x: f32, y: f32, z: f32) {
        special::set_quaternion(self, w, x, y, z);
    }

    /// `self = self * T(x, y, z)`
    fn pre_translate(&mut self, x: f32, y: f32, z: f32) {
        special::pre_translate(self, x, y, z);
    }

    /// `self = T(x, y, z) * self`
    fn post_translate(&mut self, x: f32, y: f32, z: f32) {
        special::post_translate(self, x, y, z);
    }

    /// `self = self * S(x, y, z)`: scales the linear columns.
    fn pre_scale(&mut self, x: f32, y: f32, z: f32) {
        special::pre_scale(self, x, y, z);
    }

    /// `self = S(x, y, z) * self`: scales the top three rows.
    fn post_scale(&mut self, x: f32, y: f32, z: f32) {
        special::post_scale(self, x, y, z);
    }

    /// `self = T(position) * R(euler) * S(scale)`.
    fn to_complete_transform(&mut self, euler: &Vector3, scale: &Vector3, position: &Vector3, scratch: &Scratch) {
        decompose::to_complete_transform(self, euler, scale, position, scratch);
    }

    /// Split into rotation quaternion `<w, x, y, z>`, per-axis scale and
    /// translation. Assumes no shear.
    fn decompose(
        &self,
        rotation: &mut Vector4,
        scale: &mut Vector3,
        translation: &mut Vector3,
        scratch: &Scratch,
    ) -> Result<(), MathError> {
        decompose::decompose(self, rotation, scale, translation, scratch)
    }

    /// Inverse of [`Affine::to_complete_transform`]: Euler angles, scale and
    /// position.
    fn from_complete_transform(
        &self,
        euler: &mut Vector3,
        scale: &mut Vector3,
        position: &mut Vector3,
        scratch: &Scratch,
    ) -> Result<(), MathError> {
        decompose::from_complete_transform(self, euler, scale, position, scratch)
    }
}

impl Affine for Mat3x4 {
    fn structure(&self) -> Structure {
        self.tag()
    }

    fn assume_structure(&mut self, structure: Structure) {
        self.set_tag(structure);
    }

    fn dense_product<L, R>(&mut self, lhs: &L, rhs: &R)
    where
        L: Matrix + ?Sized,
        R: Matrix + ?Sized,
    {
        kernels::mul34(self, lhs, rhs);
        self.set_tag(Structure::General);
    }

    fn dense_invert_into(&self, dest: &mut Self) -> Result<(), MathError> {
        kernels::invert34(dest, self)?;
        dest.set_tag(Structure::General);
        Ok(())
    }
}

impl Affine for Mat4 {
    fn structure(&self) -> Structure {
        self.tag()
    }

    fn assume_structure(&mut self, structure: Structure) {
        self.set_tag(structure);
    }

    fn dense_product<L, R>(&mut self, lhs: &L, rhs: &R)
    where
        L: Matrix + ?Sized,
        R: Matrix + ?Sized,
    {
        kernels::mul44(self, lhs, rhs);
        self.set_tag(Structure::General);
    }

    fn dense_invert_into(&self, dest: &mut Self) -> Result<(), MathError> {
        kernels::invert44(dest, self)?;
        dest.set_tag(Structure::General);
        Ok(())
    }
}
