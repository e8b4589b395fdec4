//! Conversions between Bevy's glam types and the nalgebra types used by `shared`.

use bevy::prelude::*;
use nalgebra::Vector3;
use shared::Rgb;

pub fn to_na(v: Vec3) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

pub fn from_na(v: &Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn srgb(rgb: Rgb) -> Color {
    Color::srgb(rgb.r, rgb.g, rgb.b)
}

pub fn srgba(rgb: Rgb, alpha: f32) -> Color {
    Color::srgba(rgb.r, rgb.g, rgb.b, alpha)
}
